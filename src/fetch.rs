//! Authenticated fetches that heal an expired or missing credential with a single retry.
//!
//! The fetcher is a two-state machine. The optimistic attempt runs the request factory with
//! whatever credential is live. When the answer is in [`RETRY_STATUSES`] the fetcher asks its
//! [`TokenSource`] for a new credential exactly once, runs the factory a second time, and
//! returns that second answer whatever it is. There is no backoff and no third attempt.

// self
use crate::{_prelude::*, auth::TokenSource, http::ApiResponse};

/// Status codes that trigger a credential refresh: unauthorized and the transport sentinel.
pub const RETRY_STATUSES: [u16; 2] = [401, crate::http::TRANSPORT_FAILURE_STATUS];

/// Which attempt produced the response returned by [`AuthenticatedFetcher::fetch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchAttempt {
	/// The first, optimistic attempt.
	Optimistic,
	/// The retry issued after a credential refresh.
	Refreshed,
}

/// Wraps request factories with retry-on-auth-failure.
#[derive(Clone)]
pub struct AuthenticatedFetcher {
	tokens: Arc<dyn TokenSource>,
}
impl AuthenticatedFetcher {
	/// Creates a fetcher that refreshes credentials through `tokens`.
	pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
		Self { tokens }
	}

	/// Returns `true` when `code` should trigger a refresh and retry.
	pub fn should_retry(code: u16) -> bool {
		RETRY_STATUSES.contains(&code)
	}

	/// Runs `request_factory`, refreshing the credential and retrying once on 401/599.
	///
	/// The factory must read the live credential each time it is invoked so the retry carries
	/// the refreshed one.
	pub async fn fetch<F, Fut>(&self, request_factory: F) -> ApiResponse
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = ApiResponse>,
	{
		self.fetch_traced(request_factory).await.0
	}

	/// Same as [`fetch`](Self::fetch) but also reports which attempt produced the response.
	pub async fn fetch_traced<F, Fut>(&self, mut request_factory: F) -> (ApiResponse, FetchAttempt)
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = ApiResponse>,
	{
		let first = request_factory().await;

		log_response(&first);

		if !Self::should_retry(first.code) {
			return (first, FetchAttempt::Optimistic);
		}

		tracing::info!(
			method = %first.request.method,
			url = %first.request.url,
			code = first.code,
			"Refreshing credential before retrying."
		);

		// A failed refresh is already logged by the token source; the retry still goes out.
		let _ = self.tokens.fetch_token().await;
		let second = request_factory().await;

		log_response(&second);

		(second, FetchAttempt::Refreshed)
	}
}
impl Debug for AuthenticatedFetcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AuthenticatedFetcher(..)")
	}
}

fn log_response(response: &ApiResponse) {
	tracing::debug!("{} {} {}", response.request.method, response.request.url, response.code);
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		auth::{Credential, TokenFuture},
		http::{Method, RequestEcho},
	};

	#[derive(Default)]
	struct CountingSource {
		calls: AtomicUsize,
		fail: bool,
	}
	impl TokenSource for CountingSource {
		fn fetch_token(&self) -> TokenFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let fail = self.fail;

			Box::pin(async move {
				if fail {
					Err(Error::TokenUnavailable { status: 500, reason: "down".into() })
				} else {
					Ok(Credential::new("fresh"))
				}
			})
		}
	}

	fn response(code: u16) -> ApiResponse {
		ApiResponse::new(
			RequestEcho { method: Method::Get, url: "https://fleet.example.com/vehicle/route/list".into() },
			code,
			format!("attempt-{code}"),
		)
	}

	async fn run(source: Arc<CountingSource>, codes: &[u16]) -> (ApiResponse, FetchAttempt, usize) {
		let fetcher = AuthenticatedFetcher::new(source);
		let invocations = AtomicUsize::new(0);
		let (response, attempt) = fetcher
			.fetch_traced(|| {
				let index = invocations.fetch_add(1, Ordering::SeqCst);
				let code = codes[index.min(codes.len() - 1)];

				async move { response(code) }
			})
			.await;

		(response, attempt, invocations.load(Ordering::SeqCst))
	}

	#[tokio::test]
	async fn non_retry_codes_return_first_response() {
		for code in [200, 204, 400, 403, 404, 500, 503] {
			let source = Arc::new(CountingSource::default());
			let (response, attempt, invocations) = run(source.clone(), &[code, 200]).await;

			assert_eq!(response.code, code);
			assert_eq!(attempt, FetchAttempt::Optimistic);
			assert_eq!(invocations, 1);
			assert_eq!(source.calls.load(Ordering::SeqCst), 0);
		}
	}

	#[tokio::test]
	async fn retry_codes_refresh_once_and_return_second_response() {
		for (first, second) in [(401, 200), (599, 200), (401, 401), (599, 599), (401, 500)] {
			let source = Arc::new(CountingSource::default());
			let (response, attempt, invocations) = run(source.clone(), &[first, second]).await;

			assert_eq!(response.code, second);
			assert_eq!(response.body, format!("attempt-{second}"));
			assert_eq!(attempt, FetchAttempt::Refreshed);
			assert_eq!(invocations, 2);
			assert_eq!(source.calls.load(Ordering::SeqCst), 1);
		}
	}

	#[tokio::test]
	async fn failed_refresh_still_retries() {
		let source = Arc::new(CountingSource { fail: true, ..Default::default() });
		let (response, _, invocations) = run(source.clone(), &[401, 401]).await;

		assert_eq!(response.code, 401);
		assert_eq!(invocations, 2);
		assert_eq!(source.calls.load(Ordering::SeqCst), 1);
	}
}
