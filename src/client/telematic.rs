//! Telematic chart and map data.

// self
use crate::{
	_prelude::*,
	client::{FleetClient, TelematicQuery},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches chart and map telematics of one vehicle.
	pub async fn get_telematic(&self, query: &TelematicQuery) -> Result<ApiResponse> {
		let spec = RequestSpec::get("telematic")
			.query("id", &query.vehicle_id)
			.query("start_time", query.start_time)
			.query("end_time", query.end_time)
			.query("chart_granularity", query.chart_granularity)
			.query("map_granularity", query.map_granularity);

		self.execute("get_telematic", spec).await
	}
}
