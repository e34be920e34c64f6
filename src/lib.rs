//! Integration-test harness for fleet-management REST APIs.
//!
//! Authenticated fetches heal expired credentials with a single retry, every resource kind with
//! create/update/delete runs through one generic lifecycle, and a sweep removes every fixture a
//! run leaves behind.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod obs;
pub mod request;
pub mod suite;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{client::FleetClient, config::Config, http::ReqwestTransport};

	/// Fleet client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = FleetClient<ReqwestTransport>;

	/// Builds a [`Config`] that points both the auth service and the API at `base`.
	///
	/// The auth endpoint lives at `<base>/auth/login` and the API root at `<base>/vehicle/`,
	/// which mirrors how the mock servers in the integration tests are laid out.
	pub fn test_config(base: &str) -> Config {
		let auth = Url::parse(&format!("{base}/auth/login"))
			.expect("Failed to parse the test auth endpoint.");
		let api = Url::parse(&format!("{base}/vehicle/"))
			.expect("Failed to parse the test API base.");

		Config::new(auth, api, serde_json::json!({ "username": "probe", "password": "secret" }))
	}

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport(config: &Config) -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client, config.request_timeout)
	}

	/// Constructs a [`FleetClient`] backed by the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_client(config: Config) -> ReqwestTestClient {
		let transport = test_reqwest_transport(&config);

		FleetClient::new(config, transport)
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(test)]
	pub use parking_lot::Mutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
// Only the driver binary uses these.
use {color_eyre as _, tokio as _};
#[cfg(test)] use httpmock as _;
