//! Observability helpers for pipeline stages.
//!
//! Every stage runs inside a span named `jobfeed.stage` carrying a `stage` field. Enable the
//! `metrics` feature to increment the `jobfeed_stage_total` counter for every stage attempt,
//! success, or failure, labeled by `stage` + `outcome` (failures add an `error` class), and to
//! record downloaded payload sizes in the `jobfeed_payload_bytes` histogram.

mod counter;
mod logging;
mod span;

pub use counter::*;
pub use logging::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// OAuth 2.0 client-credentials exchange.
	Token,
	/// Job postings download.
	Fetch,
	/// JSON to XML conversion and file write.
	Convert,
}
impl StageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::Token => "token",
			StageKind::Fetch => "fetch",
			StageKind::Convert => "convert",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure logged and absorbed by the pipeline.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
