//! Driver operations.

// self
use crate::{
	_prelude::*,
	client::{FleetClient, NamedAttributes},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

const PATH: &str = "driver";
const LIST_PATH: &str = "driver/list";
const PAGE_SIZE: u32 = 10_000;

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a driver; the payload carries the new id.
	pub async fn create_driver(&self, name: &str) -> Result<ApiResponse> {
		let body = NamedAttributes { name: name.into() };

		self.execute_json("create_driver", RequestSpec::post(PATH), &body).await
	}

	/// Lists drivers, optionally scoped to a single id.
	pub async fn list_drivers(&self, search_id: Option<&str>) -> Result<ApiResponse> {
		let spec = self
			.org_scoped(RequestSpec::get(LIST_PATH))
			.query("offset", 0)
			.query("count", PAGE_SIZE)
			.query_opt("search_id", search_id);

		self.execute("list_drivers", spec).await
	}

	/// Renames the driver `id`.
	pub async fn update_driver(&self, id: &str, name: &str) -> Result<ApiResponse> {
		let body = NamedAttributes { name: name.into() };

		self.execute_json("update_driver", RequestSpec::put(PATH).query("id", id), &body).await
	}

	/// Deletes the driver `id`.
	pub async fn delete_driver(&self, id: &str) -> Result<ApiResponse> {
		self.execute("delete_driver", RequestSpec::delete(PATH).query("id", id)).await
	}
}
