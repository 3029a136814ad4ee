//! Shared helpers for the httpmock-backed integration tests.

#![allow(dead_code)]

// std
use std::{
	env,
	fmt::Debug,
	fs,
	path::PathBuf,
	process,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use httpmock::MockServer;
use parking_lot::Mutex;
use tracing::{
	Event, Level, Subscriber,
	field::{Field, Visit},
	subscriber::DefaultGuard,
};
use tracing_subscriber::{
	layer::{Context, Layer, SubscriberExt},
	util::SubscriberInitExt,
};
// self
use jobfeed::{
	config::{Credentials, Endpoints, Settings},
	http::ReqwestHttpClient,
	reqwest::Client,
	url::Url,
	xml::XmlLayout,
};

pub const CLIENT_ID: &str = "client-credentials";
pub const CLIENT_SECRET: &str = "secret-credentials";
pub const TOKEN_PATH: &str = "/services/oauth2/token";
pub const JOBS_PATH: &str = "/services/apexrest/jobs";

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn mock_url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

pub fn credentials() -> Credentials {
	Credentials::new(CLIENT_ID, CLIENT_SECRET)
}

/// Settings pointing both endpoints at `server` and the output at `output_path`.
pub fn mock_settings(server: &MockServer, output_path: PathBuf) -> Settings {
	Settings {
		credentials: credentials(),
		endpoints: Endpoints {
			token: mock_url(server, TOKEN_PATH),
			job_postings: mock_url(server, JOBS_PATH),
		},
		output_path,
		layout: XmlLayout::default(),
	}
}

/// Unique, not yet existing directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
	static COUNTER: AtomicUsize = AtomicUsize::new(0);

	let dir = env::temp_dir().join(format!(
		"jobfeed_it_{label}_{}_{}",
		process::id(),
		COUNTER.fetch_add(1, Ordering::Relaxed),
	));

	if dir.exists() {
		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to clear stale test directory {}: {e}", dir.display())
		});
	}

	dir
}

pub fn cleanup(dir: &PathBuf) {
	if dir.exists() {
		fs::remove_dir_all(dir).unwrap_or_else(|e| {
			panic!("Failed to remove test directory {}: {e}", dir.display())
		});
	}
}

/// Event recorded by [`LogCapture`].
#[derive(Clone, Debug)]
pub struct CapturedEvent {
	pub level: Level,
	pub message: String,
}

/// Layer collecting events emitted by the crate under test.
#[derive(Clone, Default)]
pub struct LogCapture {
	events: Arc<Mutex<Vec<CapturedEvent>>>,
}
impl LogCapture {
	/// Installs the capture as the default subscriber of the current thread.
	pub fn install() -> (Self, DefaultGuard) {
		let capture = Self::default();
		let guard = tracing_subscriber::registry().with(capture.clone()).set_default();

		(capture, guard)
	}

	pub fn events(&self) -> Vec<CapturedEvent> {
		self.events.lock().clone()
	}

	pub fn count(&self, level: Level) -> usize {
		self.events.lock().iter().filter(|event| event.level == level).count()
	}

	pub fn contains(&self, level: Level, needle: &str) -> bool {
		self.events
			.lock()
			.iter()
			.any(|event| event.level == level && event.message.contains(needle))
	}
}
impl<S> Layer<S> for LogCapture
where
	S: Subscriber,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		if !event.metadata().target().starts_with("jobfeed") {
			return;
		}

		let mut visitor = MessageVisitor::default();

		event.record(&mut visitor);
		self.events
			.lock()
			.push(CapturedEvent { level: *event.metadata().level(), message: visitor.message });
	}
}

#[derive(Default)]
struct MessageVisitor {
	message: String,
}
impl Visit for MessageVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
		if field.name() == "message" {
			self.message = format!("{value:?}");
		}
	}
}
