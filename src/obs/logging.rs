// crates.io
use tracing_subscriber::{
	EnvFilter, fmt,
	layer::SubscriberExt,
	util::{SubscriberInitExt, TryInitError},
};

/// Filter applied when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global console subscriber.
///
/// `RUST_LOG` takes precedence over [`DEFAULT_LOG_FILTER`].
pub fn init_logging() -> Result<(), TryInitError> {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

	tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).try_init()
}
