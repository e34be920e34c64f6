//! Realtime vehicle field queries.

// self
use crate::{
	_prelude::*,
	client::{FleetClient, RealtimeQuery},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Queries realtime fields of a set of vehicles.
	pub async fn query_realtime(&self, query: &RealtimeQuery) -> Result<ApiResponse> {
		self.execute_json("query_realtime", RequestSpec::post("realtime"), query).await
	}
}
