//! Runs the configured fleet API suites once and logs a per-suite summary.
//!
//! Every setting comes from the environment (or `.env`); see `Config::from_env`. The exit status
//! does not reflect suite outcomes: failures are reported in the log only.

// std
use std::io::{self, IsTerminal};
// crates.io
use color_eyre::Result;
// self
use fleet_probe::{
	client::FleetClient,
	config::Config,
	obs::{self, DEFAULT_LOG_FILTER},
	suite::TestRunner,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;

	if let Err(e) = obs::install_subscriber(DEFAULT_LOG_FILTER) {
		eprintln!("Failed to install the log subscriber: {e}.");
	}

	tracing::info!("The test of the vehicle APIs is starting...");

	if let Err(e) = run().await {
		tracing::error!("An exceptional error occurred in main. {e:?}");
	}

	tracing::info!("The test ends.");

	Ok(())
}

async fn run() -> Result<()> {
	let config = Config::from_env()?;
	let client = FleetClient::from_config(config)?;
	let runner = TestRunner::new(&client).with_colors(io::stdout().is_terminal());
	let report = runner.run_configured().await;

	for (suite, tally) in report.tallies() {
		tracing::info!(suite, passed = tally.passed, failed = tally.failed, "Suite finished.");
	}

	tracing::info!(passed = report.passed(), failed = report.failed(), "All suites finished.");

	Ok(())
}
