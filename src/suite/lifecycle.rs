//! Generic create/verify/update/verify/delete/verify lifecycle plus the cleanup sweep.
//!
//! [`ResourceLifecycle`] drives any [`LifecycleResource`] through the same state machine:
//!
//! ```text
//! Init -> Created -> VerifiedCreate -> Updated -> VerifiedUpdate -> Deleted -> VerifiedDelete -> Cleaned
//! ```
//!
//! Steps run strictly in order because each one inspects the side effect of the previous
//! one. A failed step is recorded and the lifecycle moves on; steps that need a fixture that
//! was never created fail without issuing requests. The cleanup sweep always runs last.

// self
use crate::{
	_prelude::*,
	client::ResourceEntry,
	http::Method,
	obs::SuiteSpan,
	suite::{Fixture, FixtureNamer, StepReport, SuiteReport},
};

/// Boxed future returned by [`LifecycleResource`] operations.
pub type ResourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;
/// Boxed future returned by [`LifecycleResource::extra_checks`].
pub type ChecksFuture<'a> = Pin<Box<dyn Future<Output = Vec<StepReport>> + 'a + Send>>;

/// Progress of one lifecycle run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
	/// Nothing happened yet.
	Init,
	/// The fixture exists.
	Created,
	/// The fixture showed up in a scoped listing.
	VerifiedCreate,
	/// The rename was accepted.
	Updated,
	/// The new name showed up in a scoped listing.
	VerifiedUpdate,
	/// The delete was accepted.
	Deleted,
	/// The fixture disappeared from a scoped listing.
	VerifiedDelete,
	/// The cleanup sweep ran.
	Cleaned,
}

/// How a resource kind shows that a fixture is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
	/// A listing scoped to the deleted id comes back empty.
	Empty,
	/// No entry of the listing carries the deleted id.
	Excluded,
}
impl DeletePolicy {
	/// Returns `true` when `entries` shows `id` as deleted under this policy.
	pub fn is_satisfied(self, entries: &[ResourceEntry], id: &str) -> bool {
		match self {
			DeletePolicy::Empty => entries.is_empty(),
			DeletePolicy::Excluded => !contains_id(entries, id),
		}
	}
}

/// Capabilities a resource kind must offer to run through [`ResourceLifecycle`].
pub trait LifecycleResource
where
	Self: Send + Sync,
{
	/// Suite title used in report lines, e.g. `Route`.
	fn title(&self) -> &'static str;

	/// Resource path reported for create/update/delete steps, e.g. `/route`.
	fn path(&self) -> &'static str;

	/// Resource path reported for the listing step, e.g. `/route/list`.
	fn list_path(&self) -> &'static str;

	/// How deletion becomes visible.
	fn delete_policy(&self) -> DeletePolicy;

	/// Creates a fixture named `name`.
	fn create<'a>(&'a self, name: &'a str) -> ResourceFuture<'a, Fixture>;

	/// Lists instances, scoped to one id when `scope` is set.
	fn list<'a>(&'a self, scope: Option<&'a str>) -> ResourceFuture<'a, Vec<ResourceEntry>>;

	/// Renames `fixture` to `name`.
	fn update<'a>(&'a self, fixture: &'a Fixture, name: &'a str) -> ResourceFuture<'a, ()>;

	/// Deletes the instance `id`.
	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()>;

	/// Method and path of every step [`LifecycleResource::extra_checks`] reports, in order.
	fn extra_steps(&self) -> &'static [(Method, &'static str)] {
		&[]
	}

	/// Kind-specific checks run against a verified fixture, between create and update.
	fn extra_checks<'a>(&'a self, fixture: &'a Fixture, namer: &'a FixtureNamer) -> ChecksFuture<'a> {
		let _ = (fixture, namer);

		Box::pin(async { Vec::new() })
	}
}

/// Result of a cleanup sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
	/// Whether the unscoped listing succeeded.
	pub listed: bool,
	/// Entries carrying the fixture tag.
	pub matched: usize,
	/// Matched entries that were deleted.
	pub deleted: usize,
}

/// Runs the lifecycle of one resource kind.
pub struct ResourceLifecycle<'n, R>
where
	R: LifecycleResource,
{
	resource: R,
	namer: &'n FixtureNamer,
	state: LifecycleState,
}
impl<'n, R> ResourceLifecycle<'n, R>
where
	R: LifecycleResource,
{
	/// Prepares a lifecycle for `resource`, naming fixtures with `namer`.
	pub fn new(resource: R, namer: &'n FixtureNamer) -> Self {
		Self { resource, namer, state: LifecycleState::Init }
	}

	/// Returns the furthest state reached so far.
	pub fn state(&self) -> LifecycleState {
		self.state
	}

	/// Runs every step and the cleanup sweep, recording into `report`.
	///
	/// Never fails; every problem ends up as a failed step or a log line.
	pub async fn test_all(&mut self, report: &mut SuiteReport) -> LifecycleState {
		let span = SuiteSpan::new(self.resource.title(), "test_all");

		span.instrument(self.run_steps(report)).await;

		self.state
	}

	/// Deletes every instance whose name carries the fixture tag.
	///
	/// Instances left behind by earlier, aborted runs are removed too; on a clean state this
	/// deletes nothing.
	pub async fn sweep(&self) -> SweepSummary {
		let title = self.resource.title();
		let mut summary = SweepSummary::default();

		tracing::info!(suite = title, "Removing test data...");

		let entries = match self.resource.list(None).await {
			Ok(entries) => entries,
			Err(e) => {
				tracing::warn!(
					suite = title,
					error = %e,
					"An error occurred while removing test data."
				);

				return summary;
			},
		};

		summary.listed = true;

		for entry in entries
			.iter()
			.filter(|entry| entry.name.as_deref().is_some_and(|name| self.namer.is_fixture(name)))
		{
			summary.matched += 1;

			match self.resource.delete(&entry.id).await {
				Ok(()) => summary.deleted += 1,
				Err(e) => tracing::warn!(
					suite = title,
					id = %entry.id,
					error = %e,
					"Failed to delete test data."
				),
			}
		}

		tracing::info!(
			suite = title,
			matched = summary.matched,
			deleted = summary.deleted,
			"Finished."
		);

		summary
	}

	async fn run_steps(&mut self, report: &mut SuiteReport) {
		tracing::info!("[{}]", self.resource.title());

		let fixture = self.create_step(report).await;

		self.list_step(fixture.as_ref(), report).await;

		self.extra_step(fixture.as_ref(), report).await;

		let fixture = self.update_step(fixture, report).await;

		self.delete_step(fixture.as_ref(), report).await;
		self.sweep().await;
		self.advance(LifecycleState::Cleaned);
	}

	async fn create_step(&mut self, report: &mut SuiteReport) -> Option<Fixture> {
		let (title, path) = (self.resource.title(), self.resource.path());
		let name = self.namer.random_name();
		let fixture = match self.resource.create(&name).await {
			Ok(fixture) => fixture,
			Err(e) => {
				report.record(StepReport::failed(title, Method::Post, path, e.to_string()));

				return None;
			},
		};

		self.advance(LifecycleState::Created);

		let verdict = self
			.resource
			.list(Some(&fixture.id))
			.await
			.map(|entries| contains_id(&entries, &fixture.id));

		if matches!(verdict, Ok(true)) {
			self.advance(LifecycleState::VerifiedCreate);
		}

		report.record(StepReport::check(title, Method::Post, path, verdict));

		Some(fixture)
	}

	async fn list_step(&mut self, fixture: Option<&Fixture>, report: &mut SuiteReport) {
		let (title, path) = (self.resource.title(), self.resource.list_path());
		let Some(fixture) = fixture else {
			report.record(StepReport::failed(title, Method::Get, path, NO_FIXTURE));

			return;
		};
		let verdict = self
			.resource
			.list(Some(&fixture.id))
			.await
			.map(|entries| count_id(&entries, &fixture.id) == 1);

		report.record(StepReport::check(title, Method::Get, path, verdict));
	}

	async fn extra_step(&self, fixture: Option<&Fixture>, report: &mut SuiteReport) {
		let Some(fixture) = fixture else {
			let title = self.resource.title();

			for &(method, path) in self.resource.extra_steps() {
				report.record(StepReport::failed(title, method, path, NO_FIXTURE));
			}

			return;
		};

		for step in self.resource.extra_checks(fixture, self.namer).await {
			report.record(step);
		}
	}

	async fn update_step(
		&mut self,
		fixture: Option<Fixture>,
		report: &mut SuiteReport,
	) -> Option<Fixture> {
		let (title, path) = (self.resource.title(), self.resource.path());
		let Some(fixture) = fixture else {
			report.record(StepReport::failed(title, Method::Put, path, NO_FIXTURE));

			return None;
		};
		let new_name = self.namer.random_name();

		if let Err(e) = self.resource.update(&fixture, &new_name).await {
			report.record(StepReport::failed(title, Method::Put, path, e.to_string()));

			return Some(fixture);
		}

		self.advance(LifecycleState::Updated);

		let verdict = self
			.resource
			.list(Some(&fixture.id))
			.await
			.map(|entries| shows_rename(&entries, &fixture.name, &new_name));

		if matches!(verdict, Ok(true)) {
			self.advance(LifecycleState::VerifiedUpdate);
		}

		report.record(StepReport::check(title, Method::Put, path, verdict));

		Some(fixture.renamed(new_name))
	}

	async fn delete_step(&mut self, fixture: Option<&Fixture>, report: &mut SuiteReport) {
		let (title, path) = (self.resource.title(), self.resource.path());
		let Some(fixture) = fixture else {
			report.record(StepReport::failed(title, Method::Delete, path, NO_FIXTURE));

			return;
		};

		if let Err(e) = self.resource.delete(&fixture.id).await {
			report.record(StepReport::failed(title, Method::Delete, path, e.to_string()));

			return;
		}

		self.advance(LifecycleState::Deleted);

		let policy = self.resource.delete_policy();
		let verdict = self
			.resource
			.list(Some(&fixture.id))
			.await
			.map(|entries| policy.is_satisfied(&entries, &fixture.id));

		if matches!(verdict, Ok(true)) {
			self.advance(LifecycleState::VerifiedDelete);
		}

		report.record(StepReport::check(title, Method::Delete, path, verdict));
	}

	fn advance(&mut self, next: LifecycleState) {
		tracing::debug!(suite = self.resource.title(), from = ?self.state, to = ?next, "Lifecycle advanced.");

		self.state = next;
	}
}

const NO_FIXTURE: &str = "no fixture was created";

/// Returns `true` when any entry carries `id`.
pub fn contains_id(entries: &[ResourceEntry], id: &str) -> bool {
	entries.iter().any(|entry| entry.id == id)
}

/// Counts the entries carrying `id`.
pub fn count_id(entries: &[ResourceEntry], id: &str) -> usize {
	entries.iter().filter(|entry| entry.id == id).count()
}

/// Returns `true` when some entry is named `new_name` and none is still named `old_name`.
pub fn shows_rename(entries: &[ResourceEntry], old_name: &str, new_name: &str) -> bool {
	entries.iter().any(|entry| entry.is_named(new_name))
		&& !entries.iter().any(|entry| entry.is_named(old_name))
}
