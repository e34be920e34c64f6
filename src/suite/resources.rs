//! [`LifecycleResource`] adapters for the resource kinds that support create/update/delete.

// self
use crate::{
	_prelude::*,
	client::{
		CreatedResource, FleetClient, ItemsPage, ProgramAttributes, ResourceEntry,
		VehicleAttributes, VehicleFilter, grouped_entries,
	},
	error::ResponseError,
	http::{ApiResponse, HttpTransport, Method},
	suite::{
		ChecksFuture, DeletePolicy, Fixture, FixtureNamer, LifecycleResource, ResourceFuture,
		StepReport, contains_id,
	},
};

/// Routes: named entries listed as an items page, scoped by `search_id`.
pub struct Routes<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c FleetClient<T>,
}
impl<'c, T> Routes<'c, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `client`.
	pub fn new(client: &'c FleetClient<T>) -> Self {
		Self { client }
	}

	async fn create_fixture(&self, name: &str) -> Result<Fixture> {
		let created = self.client.create_route(name).await?.msg::<CreatedResource>()?;

		Ok(Fixture::new(created.id, name))
	}

	async fn list_entries(&self, scope: Option<&str>) -> Result<Vec<ResourceEntry>> {
		page_items(self.client.list_routes(scope).await?)
	}

	async fn rename(&self, fixture: &Fixture, name: &str) -> Result<()> {
		accepted(self.client.update_route(&fixture.id, name).await?)
	}

	async fn remove(&self, id: &str) -> Result<()> {
		accepted(self.client.delete_route(id).await?)
	}
}
impl<T> LifecycleResource for Routes<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn title(&self) -> &'static str {
		"Route"
	}

	fn path(&self) -> &'static str {
		"/route"
	}

	fn list_path(&self) -> &'static str {
		"/route/list"
	}

	fn delete_policy(&self) -> DeletePolicy {
		DeletePolicy::Empty
	}

	fn create<'a>(&'a self, name: &'a str) -> ResourceFuture<'a, Fixture> {
		Box::pin(self.create_fixture(name))
	}

	fn list<'a>(&'a self, scope: Option<&'a str>) -> ResourceFuture<'a, Vec<ResourceEntry>> {
		Box::pin(self.list_entries(scope))
	}

	fn update<'a>(&'a self, fixture: &'a Fixture, name: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.rename(fixture, name))
	}

	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.remove(id))
	}
}

/// Drivers: same shape as routes under `driver`.
pub struct Drivers<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c FleetClient<T>,
}
impl<'c, T> Drivers<'c, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `client`.
	pub fn new(client: &'c FleetClient<T>) -> Self {
		Self { client }
	}

	async fn create_fixture(&self, name: &str) -> Result<Fixture> {
		let created = self.client.create_driver(name).await?.msg::<CreatedResource>()?;

		Ok(Fixture::new(created.id, name))
	}

	async fn list_entries(&self, scope: Option<&str>) -> Result<Vec<ResourceEntry>> {
		page_items(self.client.list_drivers(scope).await?)
	}

	async fn rename(&self, fixture: &Fixture, name: &str) -> Result<()> {
		accepted(self.client.update_driver(&fixture.id, name).await?)
	}

	async fn remove(&self, id: &str) -> Result<()> {
		accepted(self.client.delete_driver(id).await?)
	}
}
impl<T> LifecycleResource for Drivers<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn title(&self) -> &'static str {
		"Driver"
	}

	fn path(&self) -> &'static str {
		"/driver"
	}

	fn list_path(&self) -> &'static str {
		"/driver/list"
	}

	fn delete_policy(&self) -> DeletePolicy {
		DeletePolicy::Empty
	}

	fn create<'a>(&'a self, name: &'a str) -> ResourceFuture<'a, Fixture> {
		Box::pin(self.create_fixture(name))
	}

	fn list<'a>(&'a self, scope: Option<&'a str>) -> ResourceFuture<'a, Vec<ResourceEntry>> {
		Box::pin(self.list_entries(scope))
	}

	fn update<'a>(&'a self, fixture: &'a Fixture, name: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.rename(fixture, name))
	}

	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.remove(id))
	}
}

/// Programs: bare-list listings, plus get-by-id and search checks.
pub struct Programs<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c FleetClient<T>,
}
impl<'c, T> Programs<'c, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `client`.
	pub fn new(client: &'c FleetClient<T>) -> Self {
		Self { client }
	}

	async fn create_fixture(&self, name: &str) -> Result<Fixture> {
		let id = create_program(self.client, name).await?;

		Ok(Fixture::new(id, name))
	}

	async fn list_entries(&self, scope: Option<&str>) -> Result<Vec<ResourceEntry>> {
		self.client.list_programs(scope).await?.msg()
	}

	async fn rename(&self, fixture: &Fixture, name: &str) -> Result<()> {
		let attributes = ProgramAttributes {
			name: name.into(),
			description: PROGRAM_UPDATED_DESCRIPTION.into(),
			manager: PROGRAM_MANAGER.into(),
		};

		accepted(self.client.update_program(&fixture.id, &attributes).await?)
	}

	async fn remove(&self, id: &str) -> Result<()> {
		accepted(self.client.delete_program(id).await?)
	}

	async fn checks(&self, fixture: &Fixture) -> Vec<StepReport> {
		let get = self
			.client
			.get_program(&fixture.id)
			.await
			.and_then(|response| response.msg::<ResourceEntry>())
			.map(|program| program.id == fixture.id);
		let search = async {
			let entries = self.client.search_programs(&fixture.id).await?.msg::<Vec<ResourceEntry>>()?;

			Ok::<_, Error>(contains_id(&entries, &fixture.id))
		}
		.await;

		let [(get_method, get_path), (search_method, search_path)] = PROGRAM_EXTRA_STEPS;

		vec![
			StepReport::check("Program", get_method, get_path, get),
			StepReport::check("Program", search_method, search_path, search),
		]
	}
}
impl<T> LifecycleResource for Programs<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn title(&self) -> &'static str {
		"Program"
	}

	fn path(&self) -> &'static str {
		"/program"
	}

	fn list_path(&self) -> &'static str {
		"/program/list"
	}

	fn delete_policy(&self) -> DeletePolicy {
		DeletePolicy::Excluded
	}

	fn create<'a>(&'a self, name: &'a str) -> ResourceFuture<'a, Fixture> {
		Box::pin(self.create_fixture(name))
	}

	fn list<'a>(&'a self, scope: Option<&'a str>) -> ResourceFuture<'a, Vec<ResourceEntry>> {
		Box::pin(self.list_entries(scope))
	}

	fn update<'a>(&'a self, fixture: &'a Fixture, name: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.rename(fixture, name))
	}

	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.remove(id))
	}

	fn extra_steps(&self) -> &'static [(Method, &'static str)] {
		&PROGRAM_EXTRA_STEPS
	}

	fn extra_checks<'a>(&'a self, fixture: &'a Fixture, _: &'a FixtureNamer) -> ChecksFuture<'a> {
		Box::pin(self.checks(fixture))
	}
}

/// Vehicles (`item` on the wire): unscoped listings filtered by id, plus by-device and
/// program-link checks.
pub struct Vehicles<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c FleetClient<T>,
}
impl<'c, T> Vehicles<'c, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `client`.
	pub fn new(client: &'c FleetClient<T>) -> Self {
		Self { client }
	}

	fn attributes(name: &str, device_mac: &str, note: &str, capacity: u32) -> VehicleAttributes {
		VehicleAttributes {
			driver_id: None,
			route_id: None,
			device_mac: device_mac.into(),
			name: name.into(),
			note: note.into(),
			kind: None,
			capacity,
		}
	}

	fn device_of<'f>(&'f self, fixture: &'f Fixture) -> &'f str {
		fixture.device_mac.as_deref().unwrap_or(self.client.config().probe.device_mac.as_str())
	}

	async fn create_fixture(&self, name: &str) -> Result<Fixture> {
		let device_mac = &self.client.config().probe.device_mac;
		let attributes = Self::attributes(name, device_mac, VEHICLE_NOTE, VEHICLE_CAPACITY);
		let created = self.client.create_vehicle(&attributes).await?.msg::<CreatedResource>()?;

		Ok(Fixture {
			id: created.id,
			name: name.into(),
			device_mac: Some(created.device_mac.unwrap_or_else(|| device_mac.clone())),
		})
	}

	async fn list_entries(&self, scope: Option<&str>) -> Result<Vec<ResourceEntry>> {
		let entries = page_items(self.client.list_vehicles(&VehicleFilter::default()).await?)?;

		Ok(match scope {
			Some(id) => entries.into_iter().filter(|entry| entry.id == id).collect(),
			None => entries,
		})
	}

	async fn rename(&self, fixture: &Fixture, name: &str) -> Result<()> {
		let attributes = Self::attributes(
			name,
			self.device_of(fixture),
			VEHICLE_UPDATED_NOTE,
			VEHICLE_UPDATED_CAPACITY,
		);

		accepted(self.client.update_vehicle(&fixture.id, &attributes).await?)
	}

	async fn remove(&self, id: &str) -> Result<()> {
		accepted(self.client.delete_vehicle(id).await?)
	}

	async fn listed_by_device(&self, fixture: &Fixture) -> Result<bool> {
		let response = self.client.list_vehicles_by_device([self.device_of(fixture)]).await?;
		let payload = response.msg::<JsonValue>()?;
		let group = &self.client.config().org_name;
		let entries = grouped_entries(&payload, group).ok_or_else(|| ResponseError::MissingKey {
			url: response.request.url.clone(),
			key: group.clone(),
		})?;

		Ok(contains_id(&entries, &fixture.id))
	}

	async fn linked_to_program(&self, fixture: &Fixture, namer: &FixtureNamer) -> Result<bool> {
		let program_id = create_program(self.client, &namer.random_name()).await?;
		let linked = async {
			accepted(self.client.link_program(&fixture.id, &program_id).await?)?;

			let filter = VehicleFilter::program(program_id.as_str());
			let entries = page_items(self.client.list_vehicles(&filter).await?)?;

			Ok::<_, Error>(contains_id(&entries, &fixture.id))
		}
		.await;

		if let Err(e) = self.client.delete_program(&program_id).await.and_then(accepted) {
			tracing::warn!(program_id = %program_id, error = %e, "Failed to delete the linked program.");
		}

		linked
	}

	async fn checks(&self, fixture: &Fixture, namer: &FixtureNamer) -> Vec<StepReport> {
		let by_device = self.listed_by_device(fixture).await;
		let link = self.linked_to_program(fixture, namer).await;

		let [(device_method, device_path), (link_method, link_path)] = VEHICLE_EXTRA_STEPS;

		vec![
			StepReport::check("Vehicle", device_method, device_path, by_device),
			StepReport::check("Vehicle", link_method, link_path, link),
		]
	}
}
impl<T> LifecycleResource for Vehicles<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn title(&self) -> &'static str {
		"Vehicle"
	}

	fn path(&self) -> &'static str {
		"/item"
	}

	fn list_path(&self) -> &'static str {
		"/list"
	}

	fn delete_policy(&self) -> DeletePolicy {
		DeletePolicy::Excluded
	}

	fn create<'a>(&'a self, name: &'a str) -> ResourceFuture<'a, Fixture> {
		Box::pin(self.create_fixture(name))
	}

	fn list<'a>(&'a self, scope: Option<&'a str>) -> ResourceFuture<'a, Vec<ResourceEntry>> {
		Box::pin(self.list_entries(scope))
	}

	fn update<'a>(&'a self, fixture: &'a Fixture, name: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.rename(fixture, name))
	}

	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()> {
		Box::pin(self.remove(id))
	}

	fn extra_steps(&self) -> &'static [(Method, &'static str)] {
		&VEHICLE_EXTRA_STEPS
	}

	fn extra_checks<'a>(
		&'a self,
		fixture: &'a Fixture,
		namer: &'a FixtureNamer,
	) -> ChecksFuture<'a> {
		Box::pin(self.checks(fixture, namer))
	}
}

const PROGRAM_EXTRA_STEPS: [(Method, &str); 2] =
	[(Method::Get, "/program"), (Method::Get, "/program/search")];
const VEHICLE_EXTRA_STEPS: [(Method, &str); 2] =
	[(Method::Get, "/list/by_device"), (Method::Put, "/program/link")];
const PROGRAM_DESCRIPTION: &str = "Test program";
const PROGRAM_UPDATED_DESCRIPTION: &str = "Test program1000";
const PROGRAM_MANAGER: &str = "John";
const VEHICLE_NOTE: &str = "test note";
const VEHICLE_UPDATED_NOTE: &str = "test note 222";
const VEHICLE_CAPACITY: u32 = 4;
const VEHICLE_UPDATED_CAPACITY: u32 = 22;

fn accepted(response: ApiResponse) -> Result<()> {
	response.ensure_success()?;

	Ok(())
}

fn page_items(response: ApiResponse) -> Result<Vec<ResourceEntry>> {
	Ok(response.msg::<ItemsPage<ResourceEntry>>()?.items)
}

async fn create_program<T>(client: &FleetClient<T>, name: &str) -> Result<String>
where
	T: ?Sized + HttpTransport,
{
	let attributes = ProgramAttributes {
		name: name.into(),
		description: PROGRAM_DESCRIPTION.into(),
		manager: PROGRAM_MANAGER.into(),
	};

	Ok(client.create_program(&attributes).await?.msg::<CreatedResource>()?.id)
}
