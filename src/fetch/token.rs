//! OAuth 2.0 client-credentials exchange.
//!
//! Credentials travel in the form body (`client_secret_post`) rather than an `Authorization`
//! header. No token is cached: every run requests a fresh one and uses it exactly once.

// crates.io
use oauth2::AccessToken;
// self
use crate::{
	_prelude::*,
	config::Credentials,
	error::ResponseError,
	fetch::TOKEN_ENDPOINT,
	http::ReqwestHttpClient,
};

const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
}

/// Exchanges `credentials` for a bearer token at `token_url`.
pub async fn fetch_access_token(
	http: &ReqwestHttpClient,
	token_url: &Url,
	credentials: &Credentials,
) -> Result<AccessToken> {
	let form = [
		("grant_type", GRANT_TYPE),
		("client_id", credentials.client_id.as_str()),
		("client_secret", credentials.client_secret.secret().as_str()),
	];
	let request = http.post(token_url.clone()).form(&form);
	let response = http.execute(TOKEN_ENDPOINT, request).await?;

	if !response.meta.is_success() {
		return Err(response.into_status_error(TOKEN_ENDPOINT).into());
	}

	Ok(parse_token_response(&response.body, response.meta.status)?)
}

fn parse_token_response(body: &str, status: u16) -> Result<AccessToken, ResponseError> {
	let mut de = serde_json::Deserializer::from_str(body);
	let parsed: TokenResponse = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseError::TokenParse { source, status })?;

	parsed
		.access_token
		.filter(|token| !token.is_empty())
		.map(AccessToken::new)
		.ok_or(ResponseError::MissingAccessToken)
}
