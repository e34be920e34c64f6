//! Harness settings loaded from the environment (and an optional `.env` file).
//!
//! Everything the harness treats as data rather than behavior lives here: where the auth
//! service and the API are, which identity to log in with, the fixture name tag, and the fixed
//! parameters used by the read-only probes.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError, suite::SuiteKind};

const KEY_AUTH_ENDPOINT: &str = "FLEET_AUTH_ENDPOINT";
const KEY_API_BASE: &str = "FLEET_API_BASE";
const KEY_AUTH_IDENTITY: &str = "FLEET_AUTH_IDENTITY";
const KEY_SERVICE: &str = "FLEET_SERVICE";
const KEY_ORG_NAME: &str = "FLEET_ORG_NAME";
const KEY_FIXTURE_PREFIX: &str = "FLEET_FIXTURE_PREFIX";
const KEY_REQUEST_TIMEOUT: &str = "FLEET_REQUEST_TIMEOUT_SECS";
const KEY_SUITES: &str = "FLEET_SUITES";
const KEY_PROBE_VEHICLE_ID: &str = "FLEET_PROBE_VEHICLE_ID";
const KEY_PROBE_DEVICE_MAC: &str = "FLEET_PROBE_DEVICE_MAC";

/// Complete harness configuration.
#[derive(Clone, Debug)]
pub struct Config {
	/// Auth service endpoint that issues bearer credentials.
	pub auth_endpoint: Url,
	/// Root of the fleet API; always ends with `/` so relative paths join beneath it.
	pub api_base: Url,
	/// Static identity object posted to the auth endpoint.
	pub identity: JsonValue,
	/// Value of the `X-TCLOUD-SERVICE` header sent to the auth endpoint.
	pub service: String,
	/// Organization every list query is scoped to.
	pub org_name: String,
	/// Name prefix that tags every fixture this harness creates.
	pub fixture_prefix: String,
	/// Per-request transport timeout; expiry surfaces as the 599 sentinel.
	pub request_timeout: StdDuration,
	/// Suites the driver runs, in order.
	pub suites: Vec<SuiteKind>,
	/// Fixed parameters for the read-only probes and vehicle fixtures.
	pub probe: ProbeSettings,
}
impl Config {
	/// Default `X-TCLOUD-SERVICE` header value.
	pub const DEFAULT_SERVICE: &'static str = "fm";
	/// Default organization name.
	pub const DEFAULT_ORG_NAME: &'static str = "lileesystems";
	/// Default fixture name prefix.
	pub const DEFAULT_FIXTURE_PREFIX: &'static str = "script test";
	/// Default per-request timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(20);

	/// Creates a configuration with defaults for everything except the endpoints and identity.
	pub fn new(auth_endpoint: Url, api_base: Url, identity: JsonValue) -> Self {
		Self {
			auth_endpoint,
			api_base: normalize_base(api_base),
			identity,
			service: Self::DEFAULT_SERVICE.into(),
			org_name: Self::DEFAULT_ORG_NAME.into(),
			fixture_prefix: Self::DEFAULT_FIXTURE_PREFIX.into(),
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			suites: SuiteKind::ALL.to_vec(),
			probe: ProbeSettings::default(),
		}
	}

	/// Reads an optional `.env` file, then loads settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		// A missing `.env` file is fine; every key may come from the real environment.
		let _ = dotenvy::dotenv();

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads settings through an arbitrary key lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |key: &'static str| {
			lookup(key).filter(|value| !value.trim().is_empty()).ok_or(ConfigError::Missing { key })
		};
		let auth_endpoint = parse_url(KEY_AUTH_ENDPOINT, &required(KEY_AUTH_ENDPOINT)?)?;
		let api_base = parse_url(KEY_API_BASE, &required(KEY_API_BASE)?)?;
		let identity = parse_identity(KEY_AUTH_IDENTITY, &required(KEY_AUTH_IDENTITY)?)?;
		let mut config = Self::new(auth_endpoint, api_base, identity);

		if let Some(service) = lookup(KEY_SERVICE) {
			config.service = service;
		}
		if let Some(org_name) = lookup(KEY_ORG_NAME) {
			config.org_name = org_name;
		}
		if let Some(prefix) = lookup(KEY_FIXTURE_PREFIX) {
			if prefix.trim().is_empty() {
				return Err(ConfigError::Invalid {
					key: KEY_FIXTURE_PREFIX,
					reason: "the fixture prefix must not be blank".into(),
				});
			}

			config.fixture_prefix = prefix;
		}
		if let Some(raw) = lookup(KEY_REQUEST_TIMEOUT) {
			let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
				key: KEY_REQUEST_TIMEOUT,
				reason: e.to_string(),
			})?;

			config.request_timeout = StdDuration::from_secs(secs);
		}
		if let Some(raw) = lookup(KEY_SUITES) {
			config.suites = parse_suites(&raw)?;
		}
		if let Some(vehicle_id) = lookup(KEY_PROBE_VEHICLE_ID) {
			config.probe.vehicle_id = vehicle_id;
		}
		if let Some(device_mac) = lookup(KEY_PROBE_DEVICE_MAC) {
			config.probe.device_mac = device_mac;
		}

		Ok(config)
	}

	/// Replaces the suite run list.
	pub fn with_suites<I>(mut self, suites: I) -> Self
	where
		I: IntoIterator<Item = SuiteKind>,
	{
		self.suites = suites.into_iter().collect();

		self
	}

	/// Overrides the fixture name prefix.
	pub fn with_fixture_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.fixture_prefix = prefix.into();

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}
}

/// Fixed parameters for the probes that only read data, plus the device used by vehicle
/// fixtures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeSettings {
	/// Vehicle whose telematic and realtime data is queried.
	pub vehicle_id: String,
	/// Device MAC attached to vehicle fixtures.
	pub device_mac: String,
	/// Event list window start (epoch seconds, as the API expects it).
	pub event_start: String,
	/// Event list window end.
	pub event_end: String,
	/// Telematic window start (epoch seconds).
	pub telematic_start: u64,
	/// Telematic window end (epoch seconds).
	pub telematic_end: u64,
	/// Telematic chart granularity in seconds.
	pub chart_granularity: u64,
	/// Telematic map granularity in seconds.
	pub map_granularity: u64,
	/// Fields requested from the realtime endpoint.
	pub realtime_fields: Vec<String>,
}
impl Default for ProbeSettings {
	fn default() -> Self {
		Self {
			vehicle_id: "d9144f8d-3e0f-4df6-9a89-92aa7c0d36b8".into(),
			device_mac: "lillardmac12345".into(),
			event_start: "1585149293".into(),
			event_end: "1585149293000".into(),
			telematic_start: 1_585_440_000,
			telematic_end: 1_585_499_424,
			chart_granularity: 86_400,
			map_granularity: 86_400,
			realtime_fields: ["vin", "is_engine_light_on", "device_status", "camera_info"]
				.into_iter()
				.map(Into::into)
				.collect(),
		}
	}
}

fn normalize_base(mut base: Url) -> Url {
	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());

		base.set_path(&path);
	}

	base
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { key, source })
}

fn parse_identity(key: &'static str, raw: &str) -> Result<JsonValue, ConfigError> {
	let value = serde_json::from_str::<JsonValue>(raw)
		.map_err(|e| ConfigError::InvalidIdentity { key, source: Some(e) })?;

	if value.is_object() { Ok(value) } else { Err(ConfigError::InvalidIdentity { key, source: None }) }
}

fn parse_suites(raw: &str) -> Result<Vec<SuiteKind>, ConfigError> {
	raw.split(',')
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.map(|name| {
			SuiteKind::from_str(name)
				.map_err(|e| ConfigError::Invalid { key: KEY_SUITES, reason: e.to_string() })
		})
		.collect()
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect::<HashMap<_, _>>();

		move |key| map.get(key).cloned()
	}

	fn minimal() -> Vec<(&'static str, &'static str)> {
		vec![
			(KEY_AUTH_ENDPOINT, "https://auth.example.com/api/v1/login"),
			(KEY_API_BASE, "https://fleet.example.com/api/v1/vehicle"),
			(KEY_AUTH_IDENTITY, r#"{"username":"probe","password":"secret"}"#),
		]
	}

	#[test]
	fn minimal_environment_uses_defaults() {
		let config =
			Config::from_lookup(lookup(&minimal())).expect("Minimal environment should load.");

		assert_eq!(config.api_base.as_str(), "https://fleet.example.com/api/v1/vehicle/");
		assert_eq!(config.service, "fm");
		assert_eq!(config.org_name, "lileesystems");
		assert_eq!(config.fixture_prefix, "script test");
		assert_eq!(config.request_timeout, StdDuration::from_secs(20));
		assert_eq!(config.suites, SuiteKind::ALL.to_vec());
		assert_eq!(config.probe, ProbeSettings::default());
	}

	#[test]
	fn overrides_are_applied() {
		let mut pairs = minimal();

		pairs.extend([
			(KEY_ORG_NAME, "acme"),
			(KEY_FIXTURE_PREFIX, "nightly probe"),
			(KEY_REQUEST_TIMEOUT, "5"),
			(KEY_SUITES, "route, program ,realtime"),
			(KEY_PROBE_DEVICE_MAC, "mac-42"),
		]);

		let config = Config::from_lookup(lookup(&pairs)).expect("Overrides should load.");

		assert_eq!(config.org_name, "acme");
		assert_eq!(config.fixture_prefix, "nightly probe");
		assert_eq!(config.request_timeout, StdDuration::from_secs(5));
		assert_eq!(config.suites, vec![SuiteKind::Route, SuiteKind::Program, SuiteKind::Realtime]);
		assert_eq!(config.probe.device_mac, "mac-42");
	}

	#[test]
	fn missing_and_invalid_settings_are_rejected() {
		let err = Config::from_lookup(lookup(&minimal()[..2]))
			.expect_err("Identity should be required.");

		assert!(matches!(err, ConfigError::Missing { key: KEY_AUTH_IDENTITY }));

		let mut pairs = minimal();

		pairs[2] = (KEY_AUTH_IDENTITY, "[1, 2]");

		let err = Config::from_lookup(lookup(&pairs)).expect_err("Identity must be an object.");

		assert!(matches!(err, ConfigError::InvalidIdentity { source: None, .. }));

		let mut pairs = minimal();

		pairs.push((KEY_SUITES, "route,bogus"));

		let err = Config::from_lookup(lookup(&pairs)).expect_err("Unknown suites are rejected.");

		assert!(matches!(err, ConfigError::Invalid { key: KEY_SUITES, .. }));

		let mut pairs = minimal();

		pairs[1] = (KEY_API_BASE, "not a url");

		let err = Config::from_lookup(lookup(&pairs)).expect_err("URLs must parse.");

		assert!(matches!(err, ConfigError::InvalidUrl { key: KEY_API_BASE, .. }));
	}
}
