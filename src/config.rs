//! Run configuration resolved from the environment and an optional JSON settings file.
//!
//! Environment variables win over the settings file. Credentials are the only values without a
//! default, so a missing credential is the one fatal error of a run.

// std
use std::{env, fs, io::ErrorKind};
// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{_prelude::*, error::ConfigError, xml::XmlLayout};

/// Settings file consulted when no explicit path is given.
pub const DEFAULT_SETTINGS_PATH: &str = "appsettings.json";
/// Output path used when the settings file does not name one.
pub const DEFAULT_OUTPUT_PATH: &str = "output/jobs.xml";
/// OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str =
	"https://soundphysicians--uat.sandbox.my.salesforce.com/services/oauth2/token";
/// Job postings REST endpoint.
pub const DEFAULT_JOB_POSTINGS_URL: &str =
	"https://soundphysicians--uat.sandbox.my.salesforce.com/services/apexrest/SoundCareers/all";
/// Environment variable holding the client identifier.
pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
/// Environment variable holding the client secret.
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";

/// Raw contents of the JSON settings file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SettingsFile {
	/// Fallback client identifier.
	pub client_id: Option<String>,
	/// Fallback client secret.
	pub client_secret: Option<String>,
	/// Destination of the XML document.
	pub xml_output_path: Option<PathBuf>,
	/// Token endpoint override.
	pub token_url: Option<String>,
	/// Job postings endpoint override.
	pub job_postings_url: Option<String>,
}
impl SettingsFile {
	/// Reads the settings file at `path`; a missing file yields empty settings.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let bytes = match fs::read(path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "Settings file not found; using defaults.");

				return Ok(Self::default());
			},
			Err(source) => return Err(ConfigError::SettingsRead { path: path.to_owned(), source }),
		};

		Self::from_slice(path, &bytes)
	}

	/// Parses settings from raw JSON; `path` is only used for error context.
	pub fn from_slice(path: impl AsRef<Path>, bytes: &[u8]) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::SettingsParse { path: path.as_ref().to_owned(), source })
	}
}

/// Client credentials presented to the token endpoint.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// OAuth 2.0 client identifier.
	pub client_id: ClientId,
	/// OAuth 2.0 client secret; redacted in `Debug` output.
	pub client_secret: ClientSecret,
}
impl Credentials {
	/// Wraps a client identifier and secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: ClientId::new(client_id.into()),
			client_secret: ClientSecret::new(client_secret.into()),
		}
	}
}

/// Remote endpoints contacted during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// OAuth 2.0 token endpoint.
	pub token: Url,
	/// Bearer-authenticated job postings endpoint.
	pub job_postings: Url,
}
impl Endpoints {
	/// Parses and validates both endpoints; each must use HTTPS.
	pub fn parse(token: &str, job_postings: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			token: parse_endpoint("token", token)?,
			job_postings: parse_endpoint("job postings", job_postings)?,
		})
	}

	/// Fixed production endpoints.
	pub fn production() -> Result<Self, ConfigError> {
		Self::parse(DEFAULT_TOKEN_URL, DEFAULT_JOB_POSTINGS_URL)
	}
}

/// Fully resolved configuration for one export run.
#[derive(Clone, Debug)]
pub struct Settings {
	/// Client credentials.
	pub credentials: Credentials,
	/// Remote endpoints.
	pub endpoints: Endpoints,
	/// Destination of the XML document.
	pub output_path: PathBuf,
	/// Element names used by the converter.
	pub layout: XmlLayout,
}
impl Settings {
	/// Loads the settings file at `path` and resolves it against the process environment.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let file = SettingsFile::load(path)?;

		Self::resolve_with(file, |key| env::var(key).ok())
	}

	/// Resolves `file` against an arbitrary environment lookup.
	pub fn resolve_with<F>(file: SettingsFile, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let client_id = resolve_credential(CLIENT_ID_ENV, "ClientId", &lookup, file.client_id)?;
		let client_secret =
			resolve_credential(CLIENT_SECRET_ENV, "ClientSecret", &lookup, file.client_secret)?;
		let endpoints = Endpoints::parse(
			file.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL),
			file.job_postings_url.as_deref().unwrap_or(DEFAULT_JOB_POSTINGS_URL),
		)?;
		let output_path =
			file.xml_output_path.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

		Ok(Self {
			credentials: Credentials::new(client_id, client_secret),
			endpoints,
			output_path,
			layout: XmlLayout::default(),
		})
	}

	/// Overrides the output path.
	pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.output_path = path.into();

		self
	}
}

fn resolve_credential<F>(
	env: &'static str,
	setting: &'static str,
	lookup: &F,
	fallback: Option<String>,
) -> Result<String, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	lookup(env)
		.filter(|value| !value.trim().is_empty())
		.or_else(|| fallback.filter(|value| !value.trim().is_empty()))
		.ok_or(ConfigError::MissingCredential { setting, env })
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
	let url =
		Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint: name, source })?;

	if url.scheme() != "https" {
		return Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() });
	}

	Ok(url)
}
