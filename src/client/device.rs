//! Device listing.

// self
use crate::{
	_prelude::*,
	client::FleetClient,
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists devices of the organization.
	pub async fn list_devices(&self) -> Result<ApiResponse> {
		let spec =
			self.org_scoped(RequestSpec::get("device/list")).query("offset", 0).query("count", 1_000);

		self.execute("list_devices", spec).await
	}
}
