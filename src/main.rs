//! Command-line entry point: resolve settings, then run the export pipeline once.

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
use color_eyre::Result;
// self
use jobfeed::{
	config::{DEFAULT_SETTINGS_PATH, Settings},
	obs,
	pipeline::Pipeline,
};

/// Export job postings behind an OAuth 2.0 client-credentials grant as XML.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// JSON settings file providing fallback credentials, endpoints, and the output path.
	#[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_PATH)]
	settings: PathBuf,
	/// Write the XML document here instead of the settings file's `XmlOutputPath`.
	#[arg(long, value_name = "PATH")]
	output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();
	let dotenv = dotenvy::dotenv();

	obs::init_logging()?;

	match dotenv {
		Err(e) if !e.not_found() => tracing::warn!(error = %e, "Ignoring unreadable .env file."),
		_ => (),
	}

	tracing::info!("Application started.");

	let mut settings = Settings::load(&cli.settings)?;

	if let Some(output) = cli.output {
		settings = settings.with_output_path(output);
	}

	let outcome = Pipeline::new(settings)?.run().await;

	tracing::info!(?outcome, "Application ended.");

	Ok(())
}
