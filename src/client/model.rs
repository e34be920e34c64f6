//! Request bodies and response payloads exchanged with the fleet API.

// self
use crate::_prelude::*;

/// Body of routes and drivers: they carry nothing but a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAttributes {
	/// Display name.
	pub name: String,
}

/// Full replacement body of a program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAttributes {
	/// Display name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Responsible manager.
	pub manager: String,
}

/// Full replacement body of a vehicle (`item` on the wire).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAttributes {
	/// Assigned driver, if any.
	pub driver_id: Option<String>,
	/// Assigned route, if any.
	pub route_id: Option<String>,
	/// MAC of the device installed in the vehicle.
	pub device_mac: String,
	/// Display name.
	pub name: String,
	/// Free-form note.
	pub note: String,
	/// Vehicle kind, if any.
	pub kind: Option<String>,
	/// Seating capacity.
	pub capacity: u32,
}

/// Optional filters of the vehicle listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VehicleFilter {
	/// Restrict the listing to vehicles linked to this program.
	pub program_id: Option<String>,
}
impl VehicleFilter {
	/// Restricts the listing to vehicles linked to `program_id`.
	pub fn program(program_id: impl Into<String>) -> Self {
		Self { program_id: Some(program_id.into()) }
	}
}

/// Body of a program-to-vehicle link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramLink {
	/// Program the vehicles join.
	pub program_id: String,
	/// Vehicles joining the program.
	pub vehicle_ids: Vec<String>,
}

/// Time window of the event listing, in the units the API expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventWindow {
	/// Window start.
	pub start: String,
	/// Window end.
	pub end: String,
}

/// Parameters of the telematic query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelematicQuery {
	/// Vehicle whose telematics are requested.
	pub vehicle_id: String,
	/// Window start (epoch seconds).
	pub start_time: u64,
	/// Window end (epoch seconds).
	pub end_time: u64,
	/// Chart bucket size in seconds.
	pub chart_granularity: u64,
	/// Map bucket size in seconds.
	pub map_granularity: u64,
}

/// Body of the realtime query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeQuery {
	/// Vehicles whose realtime data is requested.
	pub vehicle_ids: Vec<String>,
	/// Fields to return per vehicle.
	pub fields: Vec<String>,
}

/// `{"items": [...]}` payload used by most listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemsPage<T> {
	/// Listed entries.
	pub items: Vec<T>,
}

/// `{"list": [...]}` payload of the event listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
	/// Listed events.
	pub list: Vec<JsonValue>,
}

/// Payload returned by create operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResource {
	/// Identifier assigned by the API.
	pub id: String,
	/// Device MAC echoed back by vehicle creation.
	#[serde(default)]
	pub device_mac: Option<String>,
}

/// One entry of any listing; only `id` and `name` are interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
	/// Identifier.
	pub id: String,
	/// Display name, when the kind has one.
	#[serde(default)]
	pub name: Option<String>,
	/// Every other field, kept verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, JsonValue>,
}
impl ResourceEntry {
	/// Returns `true` when the entry is named exactly `name`.
	pub fn is_named(&self, name: &str) -> bool {
		self.name.as_deref() == Some(name)
	}
}

/// Extracts the entries grouped under `group` in a listing payload, falling back to `items`.
///
/// The by-device vehicle listing groups its entries under the organization name.
pub fn grouped_entries(payload: &JsonValue, group: &str) -> Option<Vec<ResourceEntry>> {
	let entries = payload.get(group).or_else(|| payload.get("items"))?;

	serde_json::from_value(entries.clone()).ok()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn vehicle_attributes_serialize_nulls() {
		let attributes = VehicleAttributes {
			driver_id: None,
			route_id: None,
			device_mac: "lillardmac12345".into(),
			name: "script test 1".into(),
			note: "test note".into(),
			kind: None,
			capacity: 4,
		};
		let value = serde_json::to_value(&attributes).expect("Attributes should serialize.");

		assert_eq!(
			value,
			serde_json::json!({
				"driver_id": null,
				"route_id": null,
				"device_mac": "lillardmac12345",
				"name": "script test 1",
				"note": "test note",
				"kind": null,
				"capacity": 4
			}),
		);
	}

	#[test]
	fn entries_keep_unknown_fields() {
		let entry: ResourceEntry = serde_json::from_value(serde_json::json!({
			"id": "r-1",
			"name": "script test a",
			"org_name": "lileesystems"
		}))
		.expect("Entry should decode.");

		assert!(entry.is_named("script test a"));
		assert_eq!(entry.extra.get("org_name"), Some(&JsonValue::from("lileesystems")));

		let unnamed: ResourceEntry = serde_json::from_value(serde_json::json!({ "id": "d-1" }))
			.expect("Entries without names should decode.");

		assert_eq!(unnamed.name, None);
	}

	#[test]
	fn grouped_entries_prefers_group_then_items() {
		let grouped = serde_json::json!({ "lileesystems": [{ "id": "v-1" }] });
		let paged = serde_json::json!({ "items": [{ "id": "v-2" }] });

		assert_eq!(
			grouped_entries(&grouped, "lileesystems").map(|e| e[0].id.clone()),
			Some("v-1".into()),
		);
		assert_eq!(grouped_entries(&paged, "lileesystems").map(|e| e[0].id.clone()), Some("v-2".into()));
		assert_eq!(grouped_entries(&serde_json::json!({}), "lileesystems"), None);
	}
}
