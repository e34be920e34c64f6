//! Route operations.

// self
use crate::{
	_prelude::*,
	client::{FleetClient, NamedAttributes},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

const PATH: &str = "route";
const LIST_PATH: &str = "route/list";
const PAGE_SIZE: u32 = 10_000;

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a route; the payload carries the new id.
	pub async fn create_route(&self, name: &str) -> Result<ApiResponse> {
		let body = NamedAttributes { name: name.into() };

		self.execute_json("create_route", RequestSpec::post(PATH), &body).await
	}

	/// Lists routes, optionally scoped to a single id.
	pub async fn list_routes(&self, search_id: Option<&str>) -> Result<ApiResponse> {
		let spec = self
			.org_scoped(RequestSpec::get(LIST_PATH))
			.query("offset", 0)
			.query("count", PAGE_SIZE)
			.query_opt("search_id", search_id);

		self.execute("list_routes", spec).await
	}

	/// Renames the route `id`.
	pub async fn update_route(&self, id: &str, name: &str) -> Result<ApiResponse> {
		let body = NamedAttributes { name: name.into() };

		self.execute_json("update_route", RequestSpec::put(PATH).query("id", id), &body).await
	}

	/// Deletes the route `id`.
	pub async fn delete_route(&self, id: &str) -> Result<ApiResponse> {
		self.execute("delete_route", RequestSpec::delete(PATH).query("id", id)).await
	}
}
