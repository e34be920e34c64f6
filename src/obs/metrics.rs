// self
use crate::{obs::RefreshOutcome, suite::StepOutcome};

/// Records a verification step outcome via the global metrics recorder (when enabled).
pub fn record_step_outcome(suite: &'static str, outcome: StepOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"fleet_probe_step_total",
			"suite" => suite,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (suite, outcome);
	}
}

/// Records a credential refresh outcome via the global metrics recorder (when enabled).
pub fn record_token_refresh(outcome: RefreshOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("fleet_probe_token_refresh_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_step_outcome("Route", StepOutcome::Failed);
		record_token_refresh(RefreshOutcome::Success);
	}
}
