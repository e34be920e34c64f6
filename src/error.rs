//! Harness-level error types shared across the client, token provider, and suites.

// self
use crate::_prelude::*;

/// Harness-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical harness error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request could not be built from its [`RequestSpec`](crate::request::RequestSpec).
	#[error(transparent)]
	Request(#[from] RequestError),
	/// Response did not have the expected status or shape.
	#[error(transparent)]
	Response(#[from] ResponseError),

	/// Auth service rejected the identity or replied without a usable token.
	#[error("Auth service did not issue a token: {reason}.")]
	TokenUnavailable {
		/// HTTP status code returned by the auth service.
		status: u16,
		/// Error indicator or body excerpt describing the rejection.
		reason: String,
	},
}

/// Configuration and validation failures raised while loading settings.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required setting was not provided.
	#[error("Missing required setting `{key}`.")]
	Missing {
		/// Environment key that was looked up.
		key: &'static str,
	},
	/// A setting could not be parsed.
	#[error("Setting `{key}` is invalid: {reason}.")]
	Invalid {
		/// Environment key that was looked up.
		key: &'static str,
		/// Human-readable parse failure.
		reason: String,
	},
	/// A URL setting could not be parsed.
	#[error("Setting `{key}` is not a valid URL.")]
	InvalidUrl {
		/// Environment key that was looked up.
		key: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The identity payload is not a JSON object.
	#[error("Setting `{key}` must be a JSON object.")]
	InvalidIdentity {
		/// Environment key that was looked up.
		key: &'static str,
		/// Underlying JSON failure, when the value was not JSON at all.
		#[source]
		source: Option<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while turning a request description into a dispatchable request.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// Resource path was empty.
	#[error("Request path must not be empty.")]
	EmptyPath,
	/// Resource path must be relative to the API base.
	#[error("Request path `{path}` must be relative to the API base.")]
	AbsolutePath {
		/// Offending path.
		path: String,
	},
	/// Resource path could not be joined onto the API base.
	#[error("Request path `{path}` cannot be joined onto the API base.")]
	Join {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// JSON body could not be serialized.
	#[error("Request body for `{path}` could not be serialized.")]
	Body {
		/// Path of the request whose body failed.
		path: String,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Failures raised while interpreting an API response.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// The response carried the error indicator.
	#[error("{method} {url} answered {code}: {reason}.")]
	Status {
		/// HTTP method of the request.
		method: &'static str,
		/// Target URL of the request.
		url: String,
		/// HTTP status code (599 for transport failures).
		code: u16,
		/// Error indicator text.
		reason: String,
	},
	/// The body did not match the expected JSON shape.
	#[error("{url} returned malformed JSON at `{path}`.")]
	Decode {
		/// Target URL of the request.
		url: String,
		/// JSON path at which decoding failed.
		path: String,
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
	},
	/// The payload did not carry a key the caller relies on.
	#[error("{url} returned a payload without `{key}`.")]
	MissingKey {
		/// Target URL of the request.
		url: String,
		/// Missing key.
		key: String,
	},
}
