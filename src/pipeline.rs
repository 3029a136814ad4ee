//! Linear export pipeline: token, job postings, XML.
//!
//! Each stage returns a [`Result`]; the pipeline is the single place where a failure becomes a
//! log line. A failed stage stops the run without surfacing an error to the caller, so the only
//! observable effect of a failed run is the missing output file (and the returned
//! [`PipelineOutcome`]).

// crates.io
use oauth2::AccessToken;
// self
use crate::{
	_prelude::*,
	config::Settings,
	error::ConfigError,
	fetch,
	http::ReqwestHttpClient,
	obs::{self, StageKind, StageOutcome, StageSpan},
	xml,
};

/// Final state of a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineOutcome {
	/// XML document written to the contained path.
	Written(PathBuf),
	/// No token could be obtained; nothing else ran.
	TokenFailed,
	/// Job postings could not be downloaded; nothing was written.
	FetchFailed,
	/// Payload could not be converted or persisted.
	ConvertFailed,
}
impl PipelineOutcome {
	/// Returns `true` when the output file was written.
	pub fn is_written(&self) -> bool {
		matches!(self, Self::Written(_))
	}
}

/// Runs the export stages against one resolved [`Settings`].
#[derive(Clone, Debug)]
pub struct Pipeline {
	settings: Settings,
	http: ReqwestHttpClient,
}
impl Pipeline {
	/// Creates a pipeline with the default HTTP client.
	pub fn new(settings: Settings) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(settings, ReqwestHttpClient::build()?))
	}

	/// Creates a pipeline that reuses the caller-provided HTTP client.
	pub fn with_http_client(settings: Settings, http: ReqwestHttpClient) -> Self {
		Self { settings, http }
	}

	/// Resolved settings driving this pipeline.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Runs every stage in order, stopping at the first failure.
	pub async fn run(&self) -> PipelineOutcome {
		let Some(token) = self.token_stage().await else {
			return PipelineOutcome::TokenFailed;
		};

		tracing::info!("Token retrieved successfully.");

		let Some(payload) = self.fetch_stage(&token).await else {
			return PipelineOutcome::FetchFailed;
		};

		obs::record_payload_bytes(payload.len());
		tracing::info!(bytes = payload.len(), "Job postings retrieved.");

		match self.convert_stage(&payload) {
			Some(path) => {
				tracing::info!(path = %path.display(), "XML saved.");

				PipelineOutcome::Written(path)
			},
			None => PipelineOutcome::ConvertFailed,
		}
	}

	async fn token_stage(&self) -> Option<AccessToken> {
		const KIND: StageKind = StageKind::Token;

		let span = StageSpan::new(KIND);

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let result = span
			.instrument(fetch::fetch_access_token(
				&self.http,
				&self.settings.endpoints.token,
				&self.settings.credentials,
			))
			.await;

		settle(KIND, result, "Failed to retrieve token.")
	}

	async fn fetch_stage(&self, token: &AccessToken) -> Option<String> {
		const KIND: StageKind = StageKind::Fetch;

		let span = StageSpan::new(KIND);

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let result = span
			.instrument(fetch::fetch_job_postings(
				&self.http,
				&self.settings.endpoints.job_postings,
				token,
			))
			.await;

		settle(KIND, result, "Failed to retrieve job postings.")
	}

	fn convert_stage(&self, payload: &str) -> Option<PathBuf> {
		const KIND: StageKind = StageKind::Convert;

		let _span = StageSpan::new(KIND).entered();

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let path = &self.settings.output_path;
		let result = xml::export(payload, path, &self.settings.layout)
			.map(|_| path.to_owned())
			.map_err(Error::from);

		settle(KIND, result, "Failed to convert job postings to XML or save the file.")
	}
}

fn settle<T>(kind: StageKind, result: Result<T>, failure: &'static str) -> Option<T> {
	match result {
		Ok(value) => {
			obs::record_stage_outcome(kind, StageOutcome::Success);

			Some(value)
		},
		Err(e) => {
			obs::record_stage_failure(kind, &e);
			tracing::error!(
				stage = %kind,
				error_kind = e.label(),
				error = %ErrorChain(&e),
				"{failure}"
			);

			None
		},
	}
}

/// Renders an error followed by its `source` chain.
pub struct ErrorChain<'a>(pub &'a (dyn StdError + 'static));
impl Display for ErrorChain<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)?;

		let mut source = self.0.source();

		while let Some(inner) = source {
			write!(f, " Caused by: {inner}")?;

			source = inner.source();
		}

		Ok(())
	}
}
