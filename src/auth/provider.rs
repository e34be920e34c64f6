//! Token acquisition against the auth service.
//!
//! [`TokenProvider`] posts the configured identity to the auth endpoint and, when the service
//! answers with `{"msg": {"v3": {"access_token": ...}}}`, installs the bearer credential in the
//! shared [`AuthContext`]. Failures leave the previous credential in place; the caller decides
//! whether to go on without a fresh one.

// self
use crate::{
	_prelude::*,
	auth::{AuthContext, Credential},
	config::Config,
	error::RequestError,
	http::{HttpTransport, Method, PreparedRequest},
	obs::{self, RefreshOutcome},
};

/// Header that identifies the calling service to the auth endpoint.
pub const SERVICE_HEADER: &str = "X-TCLOUD-SERVICE";

/// Boxed future returned by [`TokenSource::fetch_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Credential>> + 'a + Send>>;

/// Anything that can mint a fresh bearer credential on demand.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Obtains a new credential and makes it the live one.
	///
	/// On failure the previously live credential (if any) must stay untouched.
	fn fetch_token(&self) -> TokenFuture<'_>;
}

/// Fetches credentials from the auth service and stores them in an [`AuthContext`].
pub struct TokenProvider<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	context: Arc<AuthContext>,
	endpoint: Url,
	identity: JsonValue,
	service: String,
}
impl<T> TokenProvider<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a provider for the auth settings in `config`.
	pub fn new(config: &Config, transport: Arc<T>, context: Arc<AuthContext>) -> Self {
		Self {
			transport,
			context,
			endpoint: config.auth_endpoint.clone(),
			identity: config.identity.clone(),
			service: config.service.clone(),
		}
	}

	/// Returns the context this provider writes to.
	pub fn context(&self) -> &Arc<AuthContext> {
		&self.context
	}

	async fn request_token(&self) -> Result<Credential> {
		let body = serde_json::to_string(&self.identity)
			.map_err(|source| RequestError::Body { path: self.endpoint.to_string(), source })?;
		let request = PreparedRequest {
			method: Method::Post,
			url: self.endpoint.clone(),
			headers: vec![
				(SERVICE_HEADER, self.service.clone()),
				("Content-Type", "application/json".into()),
			],
			body: Some(body),
		};
		let response = self.transport.send(request).await;

		if let Some(reason) = response.error {
			return Err(Error::TokenUnavailable { status: response.code, reason });
		}

		let grant = response.json::<AuthGrant>()?;
		let token = grant.msg.v3.access_token;

		if token.trim().is_empty() {
			return Err(Error::TokenUnavailable {
				status: response.code,
				reason: "the access token is empty".into(),
			});
		}

		Ok(Credential::new(token))
	}
}
impl<T> TokenSource for TokenProvider<T>
where
	T: ?Sized + HttpTransport,
{
	fn fetch_token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			match self.request_token().await {
				Ok(credential) => {
					self.context.replace(credential.clone());
					obs::record_token_refresh(RefreshOutcome::Success);
					tracing::info!(endpoint = %self.endpoint, "Getting token successful.");

					Ok(credential)
				},
				Err(e) => {
					obs::record_token_refresh(RefreshOutcome::Failure);
					tracing::warn!(endpoint = %self.endpoint, error = %e, "Getting token failed.");

					Err(e)
				},
			}
		})
	}
}
impl<T> Debug for TokenProvider<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("endpoint", &self.endpoint)
			.field("service", &self.service)
			.field("authenticated", &self.context.is_authenticated())
			.finish()
	}
}

#[derive(Deserialize)]
struct AuthGrant {
	msg: AuthGrantMsg,
}
#[derive(Deserialize)]
struct AuthGrantMsg {
	v3: AuthGrantTokens,
}
#[derive(Deserialize)]
struct AuthGrantTokens {
	access_token: String,
}
