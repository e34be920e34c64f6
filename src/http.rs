//! Transport primitives for calls against the auth service and the fleet API.
//!
//! The module exposes [`HttpTransport`] alongside [`PreparedRequest`] and [`ApiResponse`] so
//! tests can swap the network for an in-process fake without touching the client. A transport
//! never fails: non-2xx answers come back with [`ApiResponse::error`] set, and transport
//! failures (DNS, TCP, TLS, timeouts) come back as the [`TRANSPORT_FAILURE_STATUS`] sentinel.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ResponseError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Status code reported when the transport could not obtain any HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 599;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = ApiResponse> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing harness requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared between
/// the token provider and the fleet client behind an [`Arc`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` and reports whatever came back, including failures.
	fn send(&self, request: PreparedRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Returns the method token as it appears on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Fully resolved request ready for a transport.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL including the query string.
	pub url: Url,
	/// Header pairs sent verbatim.
	pub headers: Vec<(&'static str, String)>,
	/// Serialized JSON body, if any.
	pub body: Option<String>,
}
impl PreparedRequest {
	/// Returns the first header value registered under `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Returns the echo attached to responses produced for this request.
	pub fn echo(&self) -> RequestEcho {
		RequestEcho { method: self.method, url: self.url.to_string() }
	}
}

/// Method and URL of the request a response answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestEcho {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL.
	pub url: String,
}

/// Uniform response object returned by every transport.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code, or [`TRANSPORT_FAILURE_STATUS`].
	pub code: u16,
	/// Error indicator; set for every non-2xx code and every transport failure.
	pub error: Option<String>,
	/// Raw response body.
	pub body: String,
	/// Echo of the request that produced this response.
	pub request: RequestEcho,
}
impl ApiResponse {
	/// Builds a response for an HTTP answer, deriving the error indicator from `code`.
	pub fn new(request: RequestEcho, code: u16, body: impl Into<String>) -> Self {
		let error = (!(200..300).contains(&code)).then(|| format!("HTTP {code}"));

		Self { code, error, body: body.into(), request }
	}

	/// Builds the sentinel response for a request that never got an HTTP answer.
	pub fn transport_failure(request: RequestEcho, reason: impl Into<String>) -> Self {
		Self { code: TRANSPORT_FAILURE_STATUS, error: Some(reason.into()), body: String::new(), request }
	}

	/// Returns `true` when the error indicator is unset.
	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}

	/// Fails with [`ResponseError::Status`] when the error indicator is set.
	pub fn ensure_success(&self) -> Result<&Self> {
		match &self.error {
			None => Ok(self),
			Some(reason) => Err(ResponseError::Status {
				method: self.request.method.as_str(),
				url: self.request.url.clone(),
				code: self.code,
				reason: reason.clone(),
			}
			.into()),
		}
	}

	/// Decodes the body as `T`, reporting the JSON path of any mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|e| {
			let path = e.path().to_string();

			ResponseError::Decode { url: self.request.url.clone(), path, source: e.into_inner() }
				.into()
		})
	}

	/// Unwraps the `{"msg": <payload>}` envelope of a successful response.
	pub fn msg<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		#[derive(Deserialize)]
		struct Envelope<T> {
			msg: T,
		}

		self.ensure_success()?;

		Ok(self.json::<Envelope<T>>()?.msg)
	}
}

/// Thin wrapper around [`ReqwestClient`] that turns every outcome into an [`ApiResponse`].
///
/// Redirects are followed with reqwest's default policy; the configured timeout applies to
/// each request individually.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	timeout: StdDuration,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a fresh client.
	pub fn new(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().build()?;

		Ok(Self::with_client(client, timeout))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, timeout: StdDuration) -> Self {
		Self { client, timeout }
	}

	async fn dispatch(&self, request: PreparedRequest) -> ApiResponse {
		let echo = request.echo();
		let mut builder = self
			.client
			.request(request.method.into(), request.url)
			.timeout(self.timeout);

		for (name, value) in request.headers {
			builder = builder.header(name, value);
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = match builder.send().await {
			Ok(response) => response,
			Err(e) => return ApiResponse::transport_failure(echo, describe_failure(&e)),
		};
		let code = response.status().as_u16();

		match response.text().await {
			Ok(body) => ApiResponse::new(echo, code, body),
			Err(e) => ApiResponse::transport_failure(echo, describe_failure(&e)),
		}
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
		Box::pin(self.dispatch(request))
	}
}

#[cfg(feature = "reqwest")]
fn describe_failure(err: &ReqwestError) -> String {
	let kind = if err.is_timeout() { "Timeout" } else { "Network error" };
	let mut message = format!("{kind}: {err}");
	let mut source = err.source();

	while let Some(inner) = source {
		message.push_str(": ");
		message.push_str(&inner.to_string());

		source = inner.source();
	}

	message
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn echo() -> RequestEcho {
		RequestEcho { method: Method::Get, url: "https://fleet.example.com/vehicle/route/list".into() }
	}

	#[test]
	fn error_indicator_tracks_status_class() {
		assert!(ApiResponse::new(echo(), 200, "{}").is_success());
		assert!(ApiResponse::new(echo(), 204, "").is_success());
		assert_eq!(ApiResponse::new(echo(), 401, "").error.as_deref(), Some("HTTP 401"));

		let failure = ApiResponse::transport_failure(echo(), "Timeout");

		assert_eq!(failure.code, TRANSPORT_FAILURE_STATUS);
		assert!(!failure.is_success());
	}

	#[test]
	fn msg_unwraps_envelope_and_reports_paths() {
		#[derive(Debug, Deserialize)]
		struct Page {
			items: Vec<Item>,
		}
		#[derive(Debug, Deserialize)]
		struct Item {
			#[allow(dead_code)]
			id: String,
		}

		let ok = ApiResponse::new(echo(), 200, r#"{"msg":{"items":[{"id":"r-1"}]}}"#);

		assert_eq!(ok.msg::<Page>().expect("Envelope should decode.").items.len(), 1);

		let malformed = ApiResponse::new(echo(), 200, r#"{"msg":{"items":[{"id":7}]}}"#);
		let err = malformed.msg::<Page>().expect_err("Numeric ids should not decode.");

		match err {
			Error::Response(ResponseError::Decode { path, .. }) =>
				assert_eq!(path, "msg.items[0].id"),
			other => panic!("Unexpected error: {other:?}."),
		}

		let rejected = ApiResponse::new(echo(), 500, r#"{"msg":"boom"}"#);

		assert!(matches!(
			rejected.msg::<JsonValue>(),
			Err(Error::Response(ResponseError::Status { code: 500, .. }))
		));
	}

	#[test]
	fn prepared_request_header_lookup_ignores_case() {
		let request = PreparedRequest {
			method: Method::Post,
			url: Url::parse("https://fleet.example.com/vehicle/route")
				.expect("Test URL should parse."),
			headers: vec![("Authorization", "Bearer abc".into())],
			body: None,
		};

		assert_eq!(request.header("authorization"), Some("Bearer abc"));
		assert_eq!(request.header("accept"), None);
		assert_eq!(request.echo().method, Method::Post);
	}
}
