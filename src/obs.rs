//! Observability helpers for harness runs.
//!
//! - Spans: every suite runs inside a `fleet_probe.suite` span carrying the `suite` title and
//!   the `stage` (call site).
//! - Metrics: enable the `metrics` feature to increment `fleet_probe_step_total` for every
//!   verification step (labeled by `suite` + `outcome`) and `fleet_probe_token_refresh_total`
//!   for every credential refresh (labeled by `outcome`).
//! - Logging: [`install_subscriber`] wires a `tracing-subscriber` fmt layer honoring
//!   `RUST_LOG`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each credential refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// The auth service issued a new credential.
	Success,
	/// The previous credential was kept.
	Failure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
