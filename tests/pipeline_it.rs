mod common;

// std
use std::fs;
// crates.io
use httpmock::prelude::*;
use tracing::Level;
// self
use common::*;
use jobfeed::pipeline::{Pipeline, PipelineOutcome};

const PAYLOAD: &str = "[{\"Id\":\"a0B1\",\"Title\":\"Hospitalist\",\"Remote\":false},{\"Id\":\"a0B2\",\"Title\":\"R&D Lead\",\"Locations\":[\"Austin\",\"Boise\"]}]";

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T\",\"token_type\":\"Bearer\"}");
		})
		.await
}

async fn mock_jobs<'a>(server: &'a MockServer, status: u16, body: &str) -> httpmock::Mock<'a> {
	let body = body.to_owned();

	server
		.mock_async(move |when, then| {
			when.method(GET).path(JOBS_PATH).header("authorization", "Bearer T");
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn successful_run_writes_xml_into_new_directories() {
	let (logs, _guard) = LogCapture::install();
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let jobs = mock_jobs(&server, 200, PAYLOAD).await;
	let root = temp_dir("success");
	let path = root.join("feeds").join("daily").join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());
	let outcome = pipeline.run().await;

	assert_eq!(outcome, PipelineOutcome::Written(path.clone()));
	assert!(outcome.is_written());

	token.assert_calls_async(1).await;
	jobs.assert_calls_async(1).await;

	let xml = fs::read_to_string(&path).expect("Output file should exist.");

	assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Roots>"), "{xml}");
	assert_eq!(xml.matches("<Root>").count(), 2, "{xml}");
	assert!(xml.contains("<Title>R&amp;D Lead</Title>"), "{xml}");
	assert!(xml.contains("<Locations>Austin</Locations>"), "{xml}");
	assert!(xml.contains("<Locations>Boise</Locations>"), "{xml}");
	assert!(xml.contains("<Remote>false</Remote>"), "{xml}");
	assert!(logs.contains(Level::INFO, "Token retrieved successfully."));
	assert!(logs.contains(Level::INFO, "Job postings retrieved."));
	assert!(logs.contains(Level::INFO, "Created output directory."));
	assert!(logs.contains(Level::INFO, "XML saved."));
	assert_eq!(logs.count(Level::ERROR), 0, "{:?}", logs.events());

	cleanup(&root);
}

#[tokio::test]
async fn rerun_overwrites_existing_output() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let root = temp_dir("rerun");
	let path = root.join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());
	let mut first_jobs = mock_jobs(&server, 200, "[{\"Id\":\"old\"}]").await;

	assert!(pipeline.run().await.is_written());

	first_jobs.delete_async().await;

	let _second_jobs = mock_jobs(&server, 200, "[{\"Id\":\"new\"}]").await;

	assert!(pipeline.run().await.is_written());

	let xml = fs::read_to_string(&path).expect("Output file should exist.");

	assert!(xml.contains("<Id>new</Id>"), "{xml}");
	assert!(!xml.contains("<Id>old</Id>"), "{xml}");

	cleanup(&root);
}

#[tokio::test]
async fn token_failure_stops_the_run() {
	let (logs, _guard) = LogCapture::install();
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400).body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let jobs = mock_jobs(&server, 200, PAYLOAD).await;
	let root = temp_dir("token_failure");
	let path = root.join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());

	assert_eq!(pipeline.run().await, PipelineOutcome::TokenFailed);

	token.assert_calls_async(1).await;
	jobs.assert_calls_async(0).await;

	assert!(!path.exists());
	assert!(!root.exists());
	assert_eq!(logs.count(Level::ERROR), 1, "{:?}", logs.events());
	assert!(logs.contains(Level::ERROR, "Failed to retrieve token."));
	assert!(!logs.contains(Level::INFO, "Token retrieved successfully."));
}

#[tokio::test]
async fn postings_failure_writes_nothing() {
	let (logs, _guard) = LogCapture::install();
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _jobs = mock_jobs(&server, 500, "{\"message\":\"boom\"}").await;
	let root = temp_dir("fetch_failure");
	let path = root.join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());

	assert_eq!(pipeline.run().await, PipelineOutcome::FetchFailed);
	assert!(!path.exists());
	assert_eq!(logs.count(Level::ERROR), 1, "{:?}", logs.events());
	assert!(logs.contains(Level::ERROR, "Failed to retrieve job postings."));
}

#[tokio::test]
async fn malformed_payload_fails_conversion_without_output() {
	let (logs, _guard) = LogCapture::install();
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _jobs = mock_jobs(&server, 200, "{\"records\":[]}").await;
	let root = temp_dir("convert_failure");
	let path = root.join("nested").join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());

	assert_eq!(pipeline.run().await, PipelineOutcome::ConvertFailed);
	assert!(!path.exists());
	assert!(!root.exists());
	assert_eq!(logs.count(Level::ERROR), 1, "{:?}", logs.events());
	assert!(logs.contains(
		Level::ERROR,
		"Failed to convert job postings to XML or save the file."
	));
	assert!(logs.contains(Level::INFO, "Job postings retrieved."));
}

#[tokio::test]
async fn control_characters_in_payload_fail_conversion() {
	let (logs, _guard) = LogCapture::install();
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _jobs = mock_jobs(&server, 200, r#"[{"Title":"Nurse\u0001","Id":"a0B1"}]"#).await;
	let root = temp_dir("control_characters");
	let path = root.join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());

	assert_eq!(pipeline.run().await, PipelineOutcome::ConvertFailed);
	assert!(!path.exists());
	assert!(!root.exists());
	assert_eq!(logs.count(Level::ERROR), 1, "{:?}", logs.events());
	assert!(!logs.contains(Level::INFO, "XML saved."));
}

#[tokio::test]
async fn empty_array_writes_childless_document() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server).await;
	let _jobs = mock_jobs(&server, 200, "[]").await;
	let root = temp_dir("empty_array");
	let path = root.join("jobs.xml");
	let pipeline =
		Pipeline::with_http_client(mock_settings(&server, path.clone()), test_http_client());

	assert!(pipeline.run().await.is_written());
	assert_eq!(
		fs::read_to_string(&path).expect("Output file should exist."),
		"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Roots/>\n"
	);

	cleanup(&root);
}
