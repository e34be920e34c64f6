//! Typed operations against the fleet API, one submodule per resource kind.
//!
//! Each operation builds a [`RequestSpec`] and hands it to [`FleetClient::execute`], which
//! validates it, runs it through the [`AuthenticatedFetcher`], and logs any failure tagged with
//! the operation name before returning it. Operations hand back the raw [`ApiResponse`];
//! decoding is left to the caller through [`ApiResponse::msg`].

pub mod model;

mod device;
mod driver;
mod event;
mod program;
mod realtime;
mod route;
mod telematic;
mod vehicle;

pub use model::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthContext, Credential, TokenProvider, TokenSource},
	config::Config,
	error::ResponseError,
	fetch::AuthenticatedFetcher,
	http::{ApiResponse, HttpTransport, TRANSPORT_FAILURE_STATUS},
	request::RequestSpec,
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestFleetClient = FleetClient<ReqwestTransport>;

/// Client for the fleet API sharing one credential across every resource kind.
pub struct FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	config: Config,
	transport: Arc<T>,
	auth: Arc<AuthContext>,
	tokens: Arc<TokenProvider<T>>,
	fetcher: AuthenticatedFetcher,
}
impl<T> FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that starts without a credential; the first call fetches one.
	pub fn new(config: Config, transport: impl Into<Arc<T>>) -> Self {
		Self::with_auth_context(config, transport, Arc::new(AuthContext::default()))
	}

	/// Creates a client around an existing [`AuthContext`].
	pub fn with_auth_context(
		config: Config,
		transport: impl Into<Arc<T>>,
		auth: Arc<AuthContext>,
	) -> Self {
		let transport = transport.into();
		let tokens = Arc::new(TokenProvider::new(&config, transport.clone(), auth.clone()));
		let fetcher = AuthenticatedFetcher::new(tokens.clone());

		Self { config, transport, auth, tokens, fetcher }
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns the shared auth context.
	pub fn auth(&self) -> &Arc<AuthContext> {
		&self.auth
	}

	/// Returns the token provider used for refreshes.
	pub fn tokens(&self) -> &Arc<TokenProvider<T>> {
		&self.tokens
	}

	/// Fetches a credential eagerly instead of waiting for the first 401.
	pub async fn authenticate(&self) -> Result<Credential> {
		self.tokens.fetch_token().await
	}

	/// Validates `spec`, sends it with retry-on-auth-failure, and logs failures under
	/// `operation`.
	///
	/// Non-2xx answers are returned as-is; only build failures and transport failures that
	/// survive the retry come back as errors.
	pub async fn execute(&self, operation: &'static str, spec: RequestSpec) -> Result<ApiResponse> {
		let result = self.dispatch(&spec).await;

		if let Err(e) = &result {
			tracing::error!(operation, path = %spec.label(), error = %e, "Operation failed.");
		}

		result
	}

	/// Attaches `body` to `spec` and runs [`FleetClient::execute`]; a body that fails to
	/// serialize is logged under `operation` like any other failure.
	pub async fn execute_json<B>(
		&self,
		operation: &'static str,
		spec: RequestSpec,
		body: &B,
	) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		let path = spec.label();

		match spec.json(body) {
			Ok(spec) => self.execute(operation, spec).await,
			Err(e) => {
				tracing::error!(operation, path = %path, error = %e, "Operation failed.");

				Err(e.into())
			},
		}
	}

	async fn dispatch(&self, spec: &RequestSpec) -> Result<ApiResponse> {
		let prepared = spec.prepare(&self.config.api_base, Vec::new())?;
		let response = self
			.fetcher
			.fetch(|| {
				let mut request = prepared.clone();

				request.headers = self.auth.api_headers();

				self.transport.send(request)
			})
			.await;

		if response.code == TRANSPORT_FAILURE_STATUS {
			return Err(ResponseError::Status {
				method: response.request.method.as_str(),
				url: response.request.url,
				code: response.code,
				reason: response.error.unwrap_or_default(),
			}
			.into());
		}

		Ok(response)
	}

	/// Query pairs every org-scoped listing starts with.
	fn org_scoped(&self, spec: RequestSpec) -> RequestSpec {
		spec.query("org_name", &self.config.org_name)
	}
}
#[cfg(feature = "reqwest")]
impl FleetClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport with the configured timeout.
	pub fn from_config(config: Config) -> Result<Self, ConfigError> {
		let transport = ReqwestTransport::new(config.request_timeout)?;

		Ok(Self::new(config, transport))
	}
}
impl<T> Debug for FleetClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FleetClient")
			.field("api_base", &self.config.api_base.as_str())
			.field("org_name", &self.config.org_name)
			.field("authenticated", &self.auth.is_authenticated())
			.finish()
	}
}
