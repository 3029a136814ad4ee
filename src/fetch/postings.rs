//! Bearer-authenticated download of the job postings payload.

// crates.io
use oauth2::AccessToken;
// self
use crate::{
	_prelude::*,
	error::ResponseError,
	fetch::JOB_POSTINGS_ENDPOINT,
	http::ReqwestHttpClient,
};

/// Downloads the raw job postings JSON from `url`.
///
/// The body is returned untouched; it is only parsed by the converter.
pub async fn fetch_job_postings(
	http: &ReqwestHttpClient,
	url: &Url,
	token: &AccessToken,
) -> Result<String> {
	let request = http.get(url.clone()).bearer_auth(token.secret());
	let response = http.execute(JOB_POSTINGS_ENDPOINT, request).await?;

	if !response.meta.is_success() {
		return Err(response.into_status_error(JOB_POSTINGS_ENDPOINT).into());
	}
	if response.body.trim().is_empty() {
		return Err(ResponseError::EmptyBody { endpoint: JOB_POSTINGS_ENDPOINT }.into());
	}

	Ok(response.body)
}
