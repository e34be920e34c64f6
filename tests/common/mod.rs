//! In-memory fleet API implementing [`HttpTransport`], for lifecycle tests that need state.

#![allow(dead_code)]

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use url::Url;
// self
use fleet_probe::{
	client::FleetClient,
	config::Config,
	http::{ApiResponse, HttpTransport, Method, PreparedRequest, TransportFuture},
};

pub const AUTH_ENDPOINT: &str = "http://fleet.test/auth/login";
pub const API_BASE: &str = "http://fleet.test/vehicle/";
pub const ORG_NAME: &str = "lileesystems";

/// Collections that support create/update/delete, keyed by their wire path.
pub const ROUTES: &str = "route";
pub const DRIVERS: &str = "driver";
pub const PROGRAMS: &str = "program";
pub const VEHICLES: &str = "item";

pub fn config() -> Config {
	Config::new(
		Url::parse(AUTH_ENDPOINT).expect("Fake auth endpoint should parse."),
		Url::parse(API_BASE).expect("Fake API base should parse."),
		json!({ "username": "probe", "password": "secret" }),
	)
}

pub fn client(fleet: &Arc<FakeFleet>) -> FleetClient<FakeFleet> {
	client_with(fleet, config())
}

pub fn client_with(fleet: &Arc<FakeFleet>, config: Config) -> FleetClient<FakeFleet> {
	FleetClient::new(config, fleet.clone())
}

#[derive(Default)]
struct FleetState {
	next_id: u64,
	token: Option<String>,
	logins: usize,
	deny_logins: bool,
	ignore_deletes: bool,
	drop_next: usize,
	collections: BTreeMap<&'static str, Vec<Map<String, Value>>>,
	requests: Vec<String>,
}

/// Fleet API double: enforces bearer credentials and keeps every collection in memory.
#[derive(Default)]
pub struct FakeFleet {
	state: Mutex<FleetState>,
}
impl FakeFleet {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Inserts an entry directly, bypassing the API.
	pub fn seed(&self, collection: &'static str, name: &str) -> String {
		let mut state = self.state.lock();
		let id = next_id(&mut state, collection);
		let mut entry = Map::new();

		entry.insert("id".into(), Value::from(id.clone()));
		entry.insert("name".into(), Value::from(name));
		state.collections.entry(collection).or_default().push(entry);

		id
	}

	pub fn names(&self, collection: &'static str) -> Vec<String> {
		self.state
			.lock()
			.collections
			.get(collection)
			.map(|entries| {
				entries
					.iter()
					.filter_map(|entry| entry.get("name").and_then(Value::as_str).map(Into::into))
					.collect()
			})
			.unwrap_or_default()
	}

	pub fn logins(&self) -> usize {
		self.state.lock().logins
	}

	/// Invalidates the issued credential so the next API call gets 401.
	pub fn revoke_token(&self) {
		self.state.lock().token = None;
	}

	pub fn deny_logins(&self, deny: bool) {
		self.state.lock().deny_logins = deny;
	}

	/// Accepts deletes without removing anything.
	pub fn ignore_deletes(&self, ignore: bool) {
		self.state.lock().ignore_deletes = ignore;
	}

	/// Answers the next `count` API calls with the transport-failure sentinel.
	pub fn drop_next(&self, count: usize) {
		self.state.lock().drop_next = count;
	}

	/// Every API request seen so far as `METHOD path?query`.
	pub fn requests(&self) -> Vec<String> {
		self.state.lock().requests.clone()
	}

	fn handle(&self, request: &PreparedRequest) -> ApiResponse {
		let echo = request.echo();
		let mut state = self.state.lock();

		if request.url.as_str() == AUTH_ENDPOINT {
			return login(&mut state, request);
		}

		let path = request.url.path().trim_start_matches("/vehicle/").to_owned();

		state.requests.push(match request.url.query() {
			Some(query) => format!("{} {path}?{query}", request.method),
			None => format!("{} {path}", request.method),
		});

		if state.drop_next > 0 {
			state.drop_next -= 1;

			return ApiResponse::transport_failure(echo, "Network error: connection reset");
		}

		let authorized = match (&state.token, request.header("Authorization")) {
			(Some(token), Some(header)) => header == format!("Bearer {token}"),
			_ => false,
		};

		if !authorized {
			return ApiResponse::new(echo, 401, r#"{"msg":"unauthorized"}"#);
		}

		let query = request
			.url
			.query_pairs()
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect::<BTreeMap<_, _>>();
		let body = request.body.as_deref().and_then(|body| serde_json::from_str::<Value>(body).ok());
		let (code, payload) = route(&mut state, request.method, &path, &query, body);

		ApiResponse::new(echo, code, json!({ "msg": payload }).to_string())
	}
}
impl HttpTransport for FakeFleet {
	fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
		let response = self.handle(&request);

		Box::pin(async move { response })
	}
}

fn login(state: &mut FleetState, request: &PreparedRequest) -> ApiResponse {
	let echo = request.echo();

	if state.deny_logins || request.header("X-TCLOUD-SERVICE") != Some("fm") {
		return ApiResponse::new(echo, 403, r#"{"msg":"denied"}"#);
	}

	state.logins += 1;

	let token = format!("token-{}", state.logins);

	state.token = Some(token.clone());

	ApiResponse::new(echo, 200, json!({ "msg": { "v3": { "access_token": token } } }).to_string())
}

fn next_id(state: &mut FleetState, collection: &str) -> String {
	state.next_id += 1;

	format!("{collection}-{}", state.next_id)
}

fn route(
	state: &mut FleetState,
	method: Method,
	path: &str,
	query: &BTreeMap<String, String>,
	body: Option<Value>,
) -> (u16, Value) {
	let id = query.get("id").cloned();

	match (method, path) {
		(Method::Post, ROUTES | DRIVERS | PROGRAMS | VEHICLES) => create(state, path, body),
		(Method::Put, ROUTES | DRIVERS | PROGRAMS | VEHICLES) => update(state, path, id, body),
		(Method::Delete, ROUTES | DRIVERS | PROGRAMS | VEHICLES) => delete(state, path, id),
		(Method::Get, "route/list") => (200, json!({ "items": scoped(state, ROUTES, query) })),
		(Method::Get, "driver/list") => (200, json!({ "items": scoped(state, DRIVERS, query) })),
		(Method::Get, "program/list") => (200, Value::from(scoped(state, PROGRAMS, query))),
		(Method::Get, "program") => match find(state, PROGRAMS, id.as_deref()) {
			Some(program) => (200, Value::Object(program)),
			None => (404, Value::from("program not found")),
		},
		(Method::Get, "program/search") => {
			let found = find(state, PROGRAMS, id.as_deref()).into_iter().map(Value::Object);

			(200, Value::Array(found.collect()))
		},
		(Method::Get, "list") => {
			let program = query.get("program_id");
			let vehicles = entries(state, VEHICLES)
				.filter(|v| program.is_none_or(|p| v.get("program_id") == Some(&Value::from(p.as_str()))))
				.map(Value::Object)
				.collect::<Vec<_>>();

			(200, json!({ "items": vehicles }))
		},
		(Method::Get, "list/by_device") => {
			let devices = query.get("device_ids").map(String::as_str).unwrap_or_default();
			let vehicles = entries(state, VEHICLES)
				.filter(|v| {
					v.get("device_mac")
						.and_then(Value::as_str)
						.is_some_and(|mac| devices.split(',').any(|d| d == mac))
				})
				.map(Value::Object)
				.collect::<Vec<_>>();

			let mut grouped = Map::new();

			grouped.insert(ORG_NAME.into(), Value::from(vehicles));

			(200, Value::Object(grouped))
		},
		(Method::Put, "program/link") => {
			let Some(link) = body else { return (400, Value::from("missing body")) };
			let program_id = link["program_id"].clone();
			let vehicle_ids = link["vehicle_ids"].as_array().cloned().unwrap_or_default();

			for vehicle in state.collections.entry(VEHICLES).or_default() {
				if vehicle_ids.contains(&vehicle["id"]) {
					vehicle.insert("program_id".into(), program_id.clone());
				}
			}

			(200, Value::from("linked"))
		},
		(Method::Get, "device/list") => (200, json!({ "items": [{ "id": "device-1" }] })),
		(Method::Get, "event/list") => (200, json!({ "list": [{ "id": "event-1" }] })),
		(Method::Get, "telematic") => (200, json!({ "chart": [1, 2, 3], "map": [] })),
		(Method::Post, "realtime") => (200, json!({ "vin": "WDB123", "device_status": "online" })),
		_ => (404, Value::from("no such endpoint")),
	}
}

fn entries<'s>(
	state: &'s FleetState,
	collection: &str,
) -> impl Iterator<Item = Map<String, Value>> + 's {
	state.collections.get(collection).into_iter().flatten().cloned()
}

fn scoped(
	state: &FleetState,
	collection: &str,
	query: &BTreeMap<String, String>,
) -> Vec<Value> {
	let search = query.get("search_id");

	entries(state, collection)
		.filter(|entry| search.is_none_or(|id| entry.get("id") == Some(&Value::from(id.as_str()))))
		.map(Value::Object)
		.collect()
}

fn find(state: &FleetState, collection: &str, id: Option<&str>) -> Option<Map<String, Value>> {
	let id = id?;

	entries(state, collection).find(|entry| entry.get("id").and_then(Value::as_str) == Some(id))
}

fn create(state: &mut FleetState, collection: &str, body: Option<Value>) -> (u16, Value) {
	let Some(Value::Object(mut entry)) = body else { return (400, Value::from("missing body")) };
	let collection = match collection {
		ROUTES => ROUTES,
		DRIVERS => DRIVERS,
		PROGRAMS => PROGRAMS,
		_ => VEHICLES,
	};
	let id = next_id(state, collection);
	let mut created = json!({ "id": id });

	if let Some(mac) = entry.get("device_mac") {
		created["device_mac"] = mac.clone();
	}

	entry.insert("id".into(), Value::from(id));
	state.collections.entry(collection).or_default().push(entry);

	(200, created)
}

fn update(
	state: &mut FleetState,
	collection: &str,
	id: Option<String>,
	body: Option<Value>,
) -> (u16, Value) {
	let Some(Value::Object(fields)) = body else { return (400, Value::from("missing body")) };
	let target = state.collections.get_mut(collection).and_then(|entries| {
		entries.iter_mut().find(|entry| entry.get("id").and_then(Value::as_str) == id.as_deref())
	});

	match target {
		Some(entry) => {
			for (key, value) in fields {
				entry.insert(key, value);
			}

			(200, Value::from("updated"))
		},
		None => (404, Value::from("not found")),
	}
}

fn delete(state: &mut FleetState, collection: &str, id: Option<String>) -> (u16, Value) {
	if state.ignore_deletes {
		return (200, Value::from("deleted"));
	}

	let Some(entries) = state.collections.get_mut(collection) else {
		return (404, Value::from("not found"));
	};
	let before = entries.len();

	entries.retain(|entry| entry.get("id").and_then(Value::as_str) != id.as_deref());

	if entries.len() < before { (200, Value::from("deleted")) } else { (404, Value::from("not found")) }
}
