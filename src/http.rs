//! Transport primitives shared by the token and job postings fetchers.
//!
//! [`ReqwestHttpClient`] owns the underlying [`ReqwestClient`] so both stages go through one
//! place that reads the body, captures [`ResponseMetadata`], and maps transport failures onto
//! [`TransportError`]. Stages decide what a success looks like; the client only reports what
//! the endpoint said.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	RequestBuilder,
	header::{HeaderMap, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResponseError, TransportError},
};

const BODY_PREVIEW_LIMIT: usize = 512;

/// Captures metadata from an HTTP response for downstream error reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Fully read HTTP response.
#[derive(Clone, Debug)]
pub struct CapturedResponse {
	/// Status and retry hints.
	pub meta: ResponseMetadata,
	/// Response body decoded as text.
	pub body: String,
}
impl CapturedResponse {
	/// Converts a non-success response into [`ResponseError::Status`].
	///
	/// Only the leading part of the body is kept so an HTML error page does not flood the logs.
	pub fn into_status_error(self, endpoint: &'static str) -> ResponseError {
		ResponseError::Status {
			endpoint,
			status: self.meta.status,
			body: body_preview(&self.body),
			retry_after: self.meta.retry_after,
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the default client, identifying the crate in the `User-Agent` header.
	pub fn build() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}

	/// Sends `request`, reads the full body, and records the response metadata.
	///
	/// Any status is returned as `Ok`; only network and body-decoding failures are errors.
	pub async fn execute(
		&self,
		endpoint: &'static str,
		request: RequestBuilder,
	) -> Result<CapturedResponse, TransportError> {
		let response =
			request.send().await.map_err(|e| TransportError::network(endpoint, e))?;
		let status = response.status().as_u16();
		let retry_after = parse_retry_after(response.headers());
		let body = response.text().await.map_err(|e| TransportError::network(endpoint, e))?;

		Ok(CapturedResponse { meta: ResponseMetadata { status, retry_after }, body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

fn body_preview(body: &str) -> String {
	let trimmed = body.trim();

	match trimmed.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((cut, _)) => format!("{}...", &trimmed[..cut]),
		None => trimmed.to_owned(),
	}
}
