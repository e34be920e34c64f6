//! Suites that exercise the fleet API and the runner that sequences them.
//!
//! Route, driver, program and vehicle suites run the generic [`ResourceLifecycle`]; device,
//! event, telematic and realtime suites are read-only probes. [`TestRunner`] runs the
//! configured suites in order and collects every step into one [`SuiteReport`].

pub mod fixture;
pub mod lifecycle;
pub mod probe;
pub mod report;
pub mod resources;

pub use fixture::*;
pub use lifecycle::*;
pub use report::*;
pub use resources::*;

// self
use crate::{_prelude::*, client::FleetClient, http::HttpTransport};

/// The suites a run can include.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SuiteKind {
	/// Route lifecycle.
	Route,
	/// Driver lifecycle.
	Driver,
	/// Device listing probe.
	Device,
	/// Program lifecycle.
	Program,
	/// Vehicle lifecycle.
	Vehicle,
	/// Event listing probe.
	Event,
	/// Telematic query probe.
	Telematic,
	/// Realtime query probe.
	Realtime,
}
impl SuiteKind {
	/// Every suite, in the order a full run executes them.
	pub const ALL: [SuiteKind; 8] = [
		SuiteKind::Route,
		SuiteKind::Driver,
		SuiteKind::Device,
		SuiteKind::Program,
		SuiteKind::Vehicle,
		SuiteKind::Event,
		SuiteKind::Telematic,
		SuiteKind::Realtime,
	];

	/// Returns the lowercase name accepted by [`FromStr`].
	pub const fn as_str(self) -> &'static str {
		match self {
			SuiteKind::Route => "route",
			SuiteKind::Driver => "driver",
			SuiteKind::Device => "device",
			SuiteKind::Program => "program",
			SuiteKind::Vehicle => "vehicle",
			SuiteKind::Event => "event",
			SuiteKind::Telematic => "telematic",
			SuiteKind::Realtime => "realtime",
		}
	}

	/// Returns the title used in report lines, e.g. `Route`.
	pub const fn title(self) -> &'static str {
		match self {
			SuiteKind::Route => "Route",
			SuiteKind::Driver => "Driver",
			SuiteKind::Device => "Device",
			SuiteKind::Program => "Program",
			SuiteKind::Vehicle => "Vehicle",
			SuiteKind::Event => "Event",
			SuiteKind::Telematic => "Telematic",
			SuiteKind::Realtime => "Realtime",
		}
	}
}
impl Display for SuiteKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SuiteKind {
	type Err = UnknownSuite;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		SuiteKind::ALL
			.into_iter()
			.find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| UnknownSuite { name: s.to_owned() })
	}
}

/// Returned when a suite name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown suite `{name}`; expected one of route, driver, device, program, vehicle, event, telematic or realtime.")]
pub struct UnknownSuite {
	/// The rejected name.
	pub name: String,
}

/// Runs suites against one [`FleetClient`].
pub struct TestRunner<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c FleetClient<T>,
	namer: FixtureNamer,
	colored: bool,
}
impl<'c, T> TestRunner<'c, T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a runner naming fixtures with the configured prefix; report lines are plain.
	pub fn new(client: &'c FleetClient<T>) -> Self {
		Self { client, namer: FixtureNamer::new(&client.config().fixture_prefix), colored: false }
	}

	/// Renders report lines with ANSI colors.
	pub fn with_colors(mut self, colored: bool) -> Self {
		self.colored = colored;

		self
	}

	/// Returns the namer used for fixtures.
	pub fn namer(&self) -> &FixtureNamer {
		&self.namer
	}

	/// Runs one suite, recording its steps into `report`.
	pub async fn run_suite(&self, kind: SuiteKind, report: &mut SuiteReport) {
		let client = self.client;

		match kind {
			SuiteKind::Route => {
				ResourceLifecycle::new(Routes::new(client), &self.namer).test_all(report).await;
			},
			SuiteKind::Driver => {
				ResourceLifecycle::new(Drivers::new(client), &self.namer).test_all(report).await;
			},
			SuiteKind::Program => {
				ResourceLifecycle::new(Programs::new(client), &self.namer).test_all(report).await;
			},
			SuiteKind::Vehicle => {
				ResourceLifecycle::new(Vehicles::new(client), &self.namer).test_all(report).await;
			},
			SuiteKind::Device => report.record(probe::devices(client).await),
			SuiteKind::Event => report.record(probe::events(client).await),
			SuiteKind::Telematic => report.record(probe::telematic(client).await),
			SuiteKind::Realtime => report.record(probe::realtime(client).await),
		}
	}

	/// Runs `suites` in order; failures never stop later suites.
	pub async fn run<I>(&self, suites: I) -> SuiteReport
	where
		I: IntoIterator<Item = SuiteKind>,
	{
		let mut report = SuiteReport::new(self.colored);

		for kind in suites {
			self.run_suite(kind, &mut report).await;
		}

		report
	}

	/// Runs the suites listed in the client's configuration.
	pub async fn run_configured(&self) -> SuiteReport {
		self.run(self.client.config().suites.clone()).await
	}
}
impl<T> Debug for TestRunner<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TestRunner")
			.field("client", self.client)
			.field("namer", &self.namer)
			.field("colored", &self.colored)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn suite_names_round_trip_case_insensitively() {
		for kind in SuiteKind::ALL {
			assert_eq!(kind.as_str().parse::<SuiteKind>(), Ok(kind));
			assert_eq!(kind.title().parse::<SuiteKind>(), Ok(kind));
		}

		let err = "fleet".parse::<SuiteKind>().expect_err("Unknown names should fail.");

		assert_eq!(err.name, "fleet");
		assert!(err.to_string().contains("`fleet`"));
	}

	#[test]
	fn full_run_orders_dependencies_first() {
		let position =
			|kind| SuiteKind::ALL.iter().position(|k| *k == kind).expect("Kind should be listed.");

		assert!(position(SuiteKind::Route) < position(SuiteKind::Vehicle));
		assert!(position(SuiteKind::Driver) < position(SuiteKind::Vehicle));
		assert!(position(SuiteKind::Program) < position(SuiteKind::Vehicle));
	}
}
