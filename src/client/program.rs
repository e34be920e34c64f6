//! Program operations.

// self
use crate::{
	_prelude::*,
	client::{FleetClient, ProgramAttributes},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

const PATH: &str = "program";

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a program; the payload carries the new id.
	pub async fn create_program(&self, attributes: &ProgramAttributes) -> Result<ApiResponse> {
		self.execute_json("create_program", RequestSpec::post(PATH), attributes).await
	}

	/// Fetches a single program; the payload is the bare program object.
	pub async fn get_program(&self, id: &str) -> Result<ApiResponse> {
		let spec = self
			.org_scoped(RequestSpec::get(PATH))
			.query("id", id)
			.query("with_children_count", false)
			.query("with_vehicle_count", false)
			.query("with_full_path", false);

		self.execute("get_program", spec).await
	}

	/// Lists programs, optionally scoped to a single id; the payload is a bare list.
	pub async fn list_programs(&self, search_id: Option<&str>) -> Result<ApiResponse> {
		let spec = self
			.org_scoped(RequestSpec::get("program/list"))
			.query("with_children_count", false)
			.query("with_vehicle_count", false)
			.query("with_full_path", false)
			.query("with_top", false)
			.query_opt("search_id", search_id);

		self.execute("list_programs", spec).await
	}

	/// Searches programs by id; the payload is a bare list.
	pub async fn search_programs(&self, id: &str) -> Result<ApiResponse> {
		let spec = self.org_scoped(RequestSpec::get("program/search")).query("id", id);

		self.execute("search_programs", spec).await
	}

	/// Replaces the program `id`.
	pub async fn update_program(
		&self,
		id: &str,
		attributes: &ProgramAttributes,
	) -> Result<ApiResponse> {
		let spec = RequestSpec::put(PATH).query("id", id);

		self.execute_json("update_program", spec, attributes).await
	}

	/// Deletes the program `id`.
	pub async fn delete_program(&self, id: &str) -> Result<ApiResponse> {
		self.execute("delete_program", RequestSpec::delete(PATH).query("id", id)).await
	}
}
