//! Error types shared across the config, fetch, and conversion stages.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal at startup.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream endpoint answered with something unusable.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// JSON to XML conversion or persistence failed.
	#[error(transparent)]
	Convert(#[from] ConvertError),
}
impl Error {
	/// Short label naming the failure class, used as a metric label.
	pub fn label(&self) -> &'static str {
		match self {
			Error::Config(_) => "config",
			Error::Transport(_) => "transport",
			Error::Response(ResponseError::Status { .. }) => "status",
			Error::Response(ResponseError::TokenParse { .. }) => "token_parse",
			Error::Response(ResponseError::MissingAccessToken) => "missing_access_token",
			Error::Response(ResponseError::EmptyBody { .. }) => "empty_body",
			Error::Convert(ConvertError::Parse { .. }) => "json_parse",
			Error::Convert(
				ConvertError::InvalidName { .. } | ConvertError::InvalidCharacter { .. },
			) => "xml_content",
			Error::Convert(ConvertError::Serialize { .. }) => "xml_serialize",
			Error::Convert(ConvertError::CreateDir { .. } | ConvertError::Write { .. }) => "io",
		}
	}
}

/// Configuration and validation failures raised before any network activity.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Neither the environment nor the settings file supplied a credential.
	#[error("{setting} is not set in the {env} environment variable or the settings file.")]
	MissingCredential {
		/// Settings file key that was consulted.
		setting: &'static str,
		/// Environment variable that was consulted.
		env: &'static str,
	},
	/// Settings file exists but could not be read.
	#[error("Settings file {} could not be read.", .path.display())]
	SettingsRead {
		/// Path of the settings file.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Settings file is not valid JSON or has unexpected value types.
	#[error("Settings file {} is malformed.", .path.display())]
	SettingsParse {
		/// Path of the settings file.
		path: PathBuf,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Endpoint override cannot be parsed as a URL.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error raised against `endpoint`.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Failures derived from an HTTP response that did arrive.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Endpoint returned a non-success status.
	#[error("The {endpoint} endpoint returned HTTP {status}: {body}")]
	Status {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Leading slice of the response body.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint succeeded without issuing an `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Endpoint succeeded with an empty body.
	#[error("The {endpoint} endpoint returned an empty body.")]
	EmptyBody {
		/// Endpoint label.
		endpoint: &'static str,
	},
}

/// JSON to XML conversion and persistence failures.
#[derive(Debug, ThisError)]
pub enum ConvertError {
	/// Input is not a JSON array.
	#[error("Payload is not a valid JSON array.")]
	Parse {
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
	/// A JSON key cannot be turned into an XML name.
	#[error("JSON key {name:?} cannot be used as an XML name.")]
	InvalidName {
		/// Offending key.
		name: String,
	},
	/// A text or attribute value holds a character XML 1.0 does not allow.
	#[error("Value of {name:?} contains U+{codepoint:04X}, which is not allowed in XML.")]
	InvalidCharacter {
		/// Element or attribute carrying the value.
		name: String,
		/// Offending code point.
		codepoint: u32,
	},
	/// XML writer failed while serializing the document.
	#[error("XML document could not be serialized.")]
	Serialize {
		/// Underlying writer failure.
		#[source]
		source: BoxError,
	},
	/// Output directory could not be created.
	#[error("Failed to create output directory {}.", .path.display())]
	CreateDir {
		/// Directory that could not be created.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Output file could not be written.
	#[error("Failed to write {}.", .path.display())]
	Write {
		/// File that could not be written.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl ConvertError {
	/// Wraps an XML writer failure inside [`ConvertError`].
	pub fn serialize(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Serialize { source: Box::new(src) }
	}
}
