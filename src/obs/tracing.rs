// crates.io
use tracing_subscriber::EnvFilter;
// self
use crate::_prelude::*;

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "fleet_probe=info";

/// A span builder used by suites.
#[derive(Clone, Debug)]
pub struct SuiteSpan {
	span: tracing::Span,
}
impl SuiteSpan {
	/// Creates a new span tagged with the provided suite title + stage.
	pub fn new(suite: &'static str, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("fleet_probe.suite", suite, stage) }
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> tracing::span::EnteredSpan {
		self.span.entered()
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> tracing::instrument::Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Installs the global fmt subscriber, filtered by `RUST_LOG` or `default_filter`.
///
/// Fails when another global subscriber is already installed.
pub fn install_subscriber(default_filter: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init()
}
