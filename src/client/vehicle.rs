//! Vehicle operations; the API calls a vehicle an `item`.

// self
use crate::{
	_prelude::*,
	client::{FleetClient, ProgramLink, VehicleAttributes, VehicleFilter},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

const PATH: &str = "item";
const PAGE_SIZE: u32 = 1_000;

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a vehicle; the payload carries the new id and the device MAC.
	pub async fn create_vehicle(&self, attributes: &VehicleAttributes) -> Result<ApiResponse> {
		self.execute_json("create_vehicle", RequestSpec::post(PATH), attributes).await
	}

	/// Lists vehicles; the listing cannot be scoped to an id.
	pub async fn list_vehicles(&self, filter: &VehicleFilter) -> Result<ApiResponse> {
		let spec = self
			.org_scoped(RequestSpec::get("list"))
			.query("with_program_info", false)
			.query("with_program_path", false)
			.query("with_device_info", false)
			.query("without_no_device", false)
			.query("offset", 0)
			.query("count", PAGE_SIZE)
			.query_opt("program_id", filter.program_id.as_deref());

		self.execute("list_vehicles", spec).await
	}

	/// Lists the vehicles carrying any of `device_ids`.
	///
	/// The payload groups vehicles under the organization name; see
	/// [`grouped_entries`](crate::client::grouped_entries).
	pub async fn list_vehicles_by_device<I, S>(&self, device_ids: I) -> Result<ApiResponse>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let device_ids =
			device_ids.into_iter().map(|id| id.as_ref().to_owned()).collect::<Vec<_>>().join(",");
		let spec = self
			.org_scoped(RequestSpec::get("list/by_device"))
			.query("device_ids", device_ids)
			.query("with_program_info", false)
			.query("with_full_path", false)
			.query("with_device_info", false);

		self.execute("list_vehicles_by_device", spec).await
	}

	/// Replaces the vehicle `id`.
	pub async fn update_vehicle(
		&self,
		id: &str,
		attributes: &VehicleAttributes,
	) -> Result<ApiResponse> {
		let spec = RequestSpec::put(PATH).query("id", id);

		self.execute_json("update_vehicle", spec, attributes).await
	}

	/// Deletes the vehicle `id`.
	pub async fn delete_vehicle(&self, id: &str) -> Result<ApiResponse> {
		self.execute("delete_vehicle", RequestSpec::delete(PATH).query("id", id)).await
	}

	/// Links the vehicle `vehicle_id` to the program `program_id`.
	pub async fn link_program(&self, vehicle_id: &str, program_id: &str) -> Result<ApiResponse> {
		let link =
			ProgramLink { program_id: program_id.into(), vehicle_ids: vec![vehicle_id.into()] };
		let spec = RequestSpec::put("program/link").query("id", vehicle_id);

		self.execute_json("link_program", spec, &link).await
	}
}
