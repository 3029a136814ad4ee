// self
use crate::{
	_prelude::*,
	obs::{StageKind, StageOutcome},
};

const STAGE_TOTAL: &str = "jobfeed_stage_total";

/// Records a stage attempt or success via the global metrics recorder (when enabled).
pub fn record_stage_outcome(kind: StageKind, outcome: StageOutcome) {
	emit_stage_total(stage_labels(kind, outcome, None));
}

/// Records a failed stage, labeled with the failure class from [`Error::label`].
pub fn record_stage_failure(kind: StageKind, error: &Error) {
	emit_stage_total(stage_labels(kind, StageOutcome::Failure, Some(error)));
}

/// Records the size of a downloaded job postings payload (when enabled).
pub fn record_payload_bytes(bytes: usize) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("jobfeed_payload_bytes").record(bytes as f64);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = bytes;
	}
}

fn stage_labels(
	kind: StageKind,
	outcome: StageOutcome,
	error: Option<&Error>,
) -> Vec<(&'static str, &'static str)> {
	let mut labels = vec![("stage", kind.as_str()), ("outcome", outcome.as_str())];

	if let Some(error) = error {
		labels.push(("error", error.label()));
	}

	labels
}

fn emit_stage_total(labels: Vec<(&'static str, &'static str)>) {
	#[cfg(feature = "metrics")]
	{
		let labels = labels
			.into_iter()
			.map(|(key, value)| metrics::Label::new(key, value))
			.collect::<Vec<_>>();

		metrics::counter!(STAGE_TOTAL, labels).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (STAGE_TOTAL, labels);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{ConvertError, ResponseError};

	#[test]
	fn success_labels_carry_no_error_class() {
		assert_eq!(
			stage_labels(StageKind::Fetch, StageOutcome::Success, None),
			[("stage", "fetch"), ("outcome", "success")]
		);
	}

	#[test]
	fn failure_labels_name_the_error_class() {
		let status = Error::from(ResponseError::Status {
			endpoint: "token",
			status: 401,
			body: String::new(),
			retry_after: None,
		});
		let parse = Error::from(ConvertError::Parse {
			source: serde_json::from_str::<Vec<u8>>("{").expect_err("Fixture must fail to parse."),
		});

		assert_eq!(
			stage_labels(StageKind::Token, StageOutcome::Failure, Some(&status)),
			[("stage", "token"), ("outcome", "failure"), ("error", "status")]
		);
		assert_eq!(
			stage_labels(StageKind::Convert, StageOutcome::Failure, Some(&parse)),
			[("stage", "convert"), ("outcome", "failure"), ("error", "json_parse")]
		);
	}

	#[test]
	fn recording_is_a_noop_without_recorder() {
		record_stage_outcome(StageKind::Convert, StageOutcome::Attempt);
		record_stage_failure(StageKind::Convert, &Error::from(ResponseError::MissingAccessToken));
		record_payload_bytes(1024);
	}
}
