//! Event listing over a time window.

// self
use crate::{
	_prelude::*,
	client::{EventWindow, FleetClient},
	http::{ApiResponse, HttpTransport},
	request::RequestSpec,
};

impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists events inside `window`; the payload is `{"list": [...]}`.
	pub async fn list_events(&self, window: &EventWindow) -> Result<ApiResponse> {
		let spec = RequestSpec::get("event/list")
			.query("start_time", &window.start)
			.query("end_time", &window.end);

		self.execute("list_events", spec).await
	}
}
