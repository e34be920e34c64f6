//! Read-only probes for resource kinds without a lifecycle.
//!
//! Each probe issues one request and reports whether the payload looks populated. Probes use the
//! fixed parameters in [`ProbeSettings`](crate::config::ProbeSettings).

// self
use crate::{
	_prelude::*,
	client::{EventPage, EventWindow, FleetClient, ItemsPage, RealtimeQuery, TelematicQuery},
	http::{HttpTransport, Method},
	obs::SuiteSpan,
	suite::StepReport,
};

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are empty.
pub fn is_truthy(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => false,
		JsonValue::Bool(b) => *b,
		JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		JsonValue::String(s) => !s.is_empty(),
		JsonValue::Array(a) => !a.is_empty(),
		JsonValue::Object(o) => !o.is_empty(),
	}
}

/// `GET /device/list` answers with an items page.
pub async fn devices<T>(client: &FleetClient<T>) -> StepReport
where
	T: ?Sized + HttpTransport,
{
	let verdict = probe("Device", async {
		client.list_devices().await?.msg::<ItemsPage<JsonValue>>()?;

		Ok::<_, Error>(true)
	})
	.await;

	StepReport::check("Device", Method::Get, "/device/list", verdict)
}

/// `GET /event/list` over the configured window returns at least one event.
pub async fn events<T>(client: &FleetClient<T>) -> StepReport
where
	T: ?Sized + HttpTransport,
{
	let probe_settings = &client.config().probe;
	let window =
		EventWindow { start: probe_settings.event_start.clone(), end: probe_settings.event_end.clone() };
	let verdict = probe("Event", async {
		let page = client.list_events(&window).await?.msg::<EventPage>()?;

		Ok::<_, Error>(!page.list.is_empty())
	})
	.await;

	StepReport::check("Event", Method::Get, "/event/list", verdict)
}

/// `GET /telematic` for the probe vehicle returns a populated payload.
pub async fn telematic<T>(client: &FleetClient<T>) -> StepReport
where
	T: ?Sized + HttpTransport,
{
	let probe_settings = &client.config().probe;
	let query = TelematicQuery {
		vehicle_id: probe_settings.vehicle_id.clone(),
		start_time: probe_settings.telematic_start,
		end_time: probe_settings.telematic_end,
		chart_granularity: probe_settings.chart_granularity,
		map_granularity: probe_settings.map_granularity,
	};
	let verdict = probe("Telematic", async {
		Ok::<_, Error>(is_truthy(&client.get_telematic(&query).await?.msg::<JsonValue>()?))
	})
	.await;

	StepReport::check("Telematic", Method::Get, "/telematic", verdict)
}

/// `POST /realtime` for the probe vehicle returns a populated payload.
pub async fn realtime<T>(client: &FleetClient<T>) -> StepReport
where
	T: ?Sized + HttpTransport,
{
	let probe_settings = &client.config().probe;
	let query = RealtimeQuery {
		vehicle_ids: vec![probe_settings.vehicle_id.clone()],
		fields: probe_settings.realtime_fields.clone(),
	};
	let verdict = probe("Realtime", async {
		Ok::<_, Error>(is_truthy(&client.query_realtime(&query).await?.msg::<JsonValue>()?))
	})
	.await;

	StepReport::check("Realtime", Method::Post, "/realtime", verdict)
}

async fn probe<Fut>(title: &'static str, check: Fut) -> Result<bool>
where
	Fut: Future<Output = Result<bool>>,
{
	tracing::info!("[{title}]");

	SuiteSpan::new(title, "probe").instrument(check).await
}
