//! Request-builder value object used by every client operation.

// self
use crate::{
	_prelude::*,
	error::RequestError,
	http::{Method, PreparedRequest},
};

/// Immutable description of one API call: method, path relative to the API base, ordered
/// query parameters, and an optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the API base (no leading `/`).
	pub path: Cow<'static, str>,
	/// Query parameters in the order they are appended.
	pub query: Vec<(Cow<'static, str>, String)>,
	/// JSON body, if any.
	pub body: Option<JsonValue>,
}
impl RequestSpec {
	/// Starts a request description for `method` on `path`.
	pub fn new(method: Method, path: impl Into<Cow<'static, str>>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), body: None }
	}

	/// Starts a `GET` description.
	pub fn get(path: impl Into<Cow<'static, str>>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Starts a `POST` description.
	pub fn post(path: impl Into<Cow<'static, str>>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Starts a `PUT` description.
	pub fn put(path: impl Into<Cow<'static, str>>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Starts a `DELETE` description.
	pub fn delete(path: impl Into<Cow<'static, str>>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query parameter when `value` is present.
	pub fn query_opt(self, key: impl Into<Cow<'static, str>>, value: Option<impl ToString>) -> Self {
		match value {
			Some(value) => self.query(key, value),
			None => self,
		}
	}

	/// Attaches a JSON body built from any serializable value.
	pub fn json<B>(mut self, body: &B) -> Result<Self, RequestError>
	where
		B: ?Sized + Serialize,
	{
		let value = serde_json::to_value(body)
			.map_err(|source| RequestError::Body { path: self.path.to_string(), source })?;

		self.body = Some(value);

		Ok(self)
	}

	/// Validates the description and resolves it against `base`.
	pub fn url(&self, base: &Url) -> Result<Url, RequestError> {
		let path = self.path.trim();

		if path.is_empty() {
			return Err(RequestError::EmptyPath);
		}
		if path.starts_with('/') || path.contains("://") {
			return Err(RequestError::AbsolutePath { path: path.into() });
		}

		let mut url = base
			.join(path)
			.map_err(|source| RequestError::Join { path: path.into(), source })?;

		if !self.query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in &self.query {
				pairs.append_pair(key, value);
			}
		}

		Ok(url)
	}

	/// Produces a transport request carrying `headers`.
	pub fn prepare(
		&self,
		base: &Url,
		headers: Vec<(&'static str, String)>,
	) -> Result<PreparedRequest, RequestError> {
		let url = self.url(base)?;
		let body = self
			.body
			.as_ref()
			.map(serde_json::to_string)
			.transpose()
			.map_err(|source| RequestError::Body { path: self.path.to_string(), source })?;

		Ok(PreparedRequest { method: self.method, url, headers, body })
	}

	/// Returns `/<path>`, the label used in step reports and logs.
	pub fn label(&self) -> String {
		format!("/{}", self.path)
	}
}
