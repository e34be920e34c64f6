//! Pass/fail records of verification steps and their console rendering.

// crates.io
use anstyle::{AnsiColor, Style};
// self
use crate::{_prelude::*, http::Method, obs};

/// Outcome of one verification step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// The expected state was observed.
	Passed,
	/// The expected state was not observed, or the step could not run.
	Failed,
}
impl StepOutcome {
	/// Returns a stable label suitable for report lines, span fields, or metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Passed => "successful",
			StepOutcome::Failed => "failed",
		}
	}

	fn style(self) -> Style {
		let color = match self {
			StepOutcome::Passed => AnsiColor::Green,
			StepOutcome::Failed => AnsiColor::Red,
		};

		Style::new().fg_color(Some(color.into()))
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Record of one verification step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
	/// Suite title, e.g. `Route`.
	pub suite: &'static str,
	/// Method of the operation under test.
	pub method: Method,
	/// Resource path of the operation under test, e.g. `/route/list`.
	pub path: String,
	/// Verdict.
	pub outcome: StepOutcome,
	/// Why the step failed, when it did.
	pub detail: Option<String>,
}
impl StepReport {
	/// Records a passed step.
	pub fn passed(suite: &'static str, method: Method, path: impl Into<String>) -> Self {
		Self { suite, method, path: path.into(), outcome: StepOutcome::Passed, detail: None }
	}

	/// Records a failed step.
	pub fn failed(
		suite: &'static str,
		method: Method,
		path: impl Into<String>,
		detail: impl Into<String>,
	) -> Self {
		Self {
			suite,
			method,
			path: path.into(),
			outcome: StepOutcome::Failed,
			detail: Some(detail.into()),
		}
	}

	/// Turns a verification verdict into a record; errors become failures.
	pub fn check(
		suite: &'static str,
		method: Method,
		path: impl Into<String>,
		verdict: Result<bool>,
	) -> Self {
		match verdict {
			Ok(true) => Self::passed(suite, method, path),
			Ok(false) => Self::failed(suite, method, path, "expected state was not observed"),
			Err(e) => Self::failed(suite, method, path, e.to_string()),
		}
	}

	/// Returns `true` when the step passed.
	pub fn is_passed(&self) -> bool {
		self.outcome == StepOutcome::Passed
	}

	/// Renders `[Suite]METHOD/path outcome`, optionally with ANSI colors.
	pub fn render(&self, colored: bool) -> String {
		if !colored {
			return format!("[{}]{}{} {}", self.suite, self.method, self.path, self.outcome);
		}

		let method = method_style(self.method);
		let outcome = self.outcome.style();

		format!(
			"[{}]{}{}{}{} {}{}{}",
			self.suite,
			method.render(),
			self.method,
			method.render_reset(),
			self.path,
			outcome.render(),
			self.outcome,
			outcome.render_reset(),
		)
	}
}

/// Pass/fail tally of one suite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
	/// Passed steps.
	pub passed: usize,
	/// Failed steps.
	pub failed: usize,
}

/// Every step recorded during a run, in order.
#[derive(Clone, Debug, Default)]
pub struct SuiteReport {
	steps: Vec<StepReport>,
	colored: bool,
}
impl SuiteReport {
	/// Creates an empty report that renders with or without colors.
	pub fn new(colored: bool) -> Self {
		Self { steps: Vec::new(), colored }
	}

	/// Logs `step` and appends it.
	pub fn record(&mut self, step: StepReport) {
		obs::record_step_outcome(step.suite, step.outcome);

		let line = step.render(self.colored);

		match (&step.outcome, &step.detail) {
			(StepOutcome::Failed, Some(detail)) => tracing::warn!(
				suite = step.suite,
				method = %step.method,
				path = %step.path,
				outcome = %step.outcome,
				detail = %detail,
				"{line}"
			),
			_ => tracing::info!(
				suite = step.suite,
				method = %step.method,
				path = %step.path,
				outcome = %step.outcome,
				"{line}"
			),
		}

		self.steps.push(step);
	}

	/// Returns every recorded step.
	pub fn steps(&self) -> &[StepReport] {
		&self.steps
	}

	/// Returns the steps recorded for `suite`.
	pub fn steps_for<'a>(&'a self, suite: &'a str) -> impl Iterator<Item = &'a StepReport> + 'a {
		self.steps.iter().filter(move |step| step.suite == suite)
	}

	/// Returns the number of passed steps.
	pub fn passed(&self) -> usize {
		self.steps.iter().filter(|step| step.is_passed()).count()
	}

	/// Returns the number of failed steps.
	pub fn failed(&self) -> usize {
		self.steps.len() - self.passed()
	}

	/// Returns `true` when at least one step ran and none failed.
	pub fn all_passed(&self) -> bool {
		!self.steps.is_empty() && self.failed() == 0
	}

	/// Returns per-suite tallies keyed by suite title.
	pub fn tallies(&self) -> BTreeMap<&'static str, Tally> {
		let mut tallies = BTreeMap::<&'static str, Tally>::new();

		for step in &self.steps {
			let tally = tallies.entry(step.suite).or_default();

			match step.outcome {
				StepOutcome::Passed => tally.passed += 1,
				StepOutcome::Failed => tally.failed += 1,
			}
		}

		tallies
	}
}

fn method_style(method: Method) -> Style {
	let color = match method {
		Method::Get => AnsiColor::Blue,
		Method::Post => AnsiColor::Green,
		Method::Put => AnsiColor::Yellow,
		Method::Delete => AnsiColor::Red,
	};

	Style::new().fg_color(Some(color.into()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ResponseError;

	#[test]
	fn render_matches_console_format() {
		let step = StepReport::passed("Route", Method::Post, "/route");

		assert_eq!(step.render(false), "[Route]POST/route successful");

		let colored = step.render(true);

		assert!(colored.starts_with("[Route]\u{1b}["));
		assert!(colored.contains("POST"));
		assert!(colored.ends_with("\u{1b}[0m"));
	}

	#[test]
	fn check_maps_verdicts() {
		assert!(StepReport::check("Route", Method::Get, "/route/list", Ok(true)).is_passed());

		let missing = StepReport::check("Route", Method::Get, "/route/list", Ok(false));

		assert_eq!(missing.outcome, StepOutcome::Failed);
		assert_eq!(missing.detail.as_deref(), Some("expected state was not observed"));

		let errored = StepReport::check(
			"Route",
			Method::Delete,
			"/route",
			Err(ResponseError::MissingKey { url: "https://x/route".into(), key: "msg".into() }.into()),
		);

		assert_eq!(errored.outcome, StepOutcome::Failed);
		assert!(errored.detail.as_deref().is_some_and(|d| d.contains("msg")));
	}

	#[test]
	fn report_tallies_per_suite() {
		let mut report = SuiteReport::default();

		assert!(!report.all_passed());

		report.record(StepReport::passed("Route", Method::Post, "/route"));
		report.record(StepReport::failed("Route", Method::Put, "/route", "stale name"));
		report.record(StepReport::passed("Device", Method::Get, "/device/list"));

		assert_eq!(report.passed(), 2);
		assert_eq!(report.failed(), 1);
		assert!(!report.all_passed());
		assert_eq!(report.steps_for("Route").count(), 2);

		let tallies = report.tallies();

		assert_eq!(tallies["Route"], Tally { passed: 1, failed: 1 });
		assert_eq!(tallies["Device"], Tally { passed: 1, failed: 0 });
	}
}
