//! Shared holder of the live credential and the headers derived from it.

// self
use crate::{_prelude::*, auth::Credential};

/// Holds at most one live [`Credential`].
///
/// Every outgoing API request reads its headers from here at dispatch time; only
/// [`TokenProvider`](crate::auth::TokenProvider) replaces the credential. The lock is never
/// held across an `.await`.
#[derive(Debug, Default)]
pub struct AuthContext {
	current: RwLock<Option<Credential>>,
}
impl AuthContext {
	/// Creates a context that starts out holding `credential`.
	pub fn with_credential(credential: Credential) -> Self {
		Self { current: RwLock::new(Some(credential)) }
	}

	/// Returns a copy of the live credential, if one has been issued.
	pub fn credential(&self) -> Option<Credential> {
		self.current.read().clone()
	}

	/// Returns `true` once a credential has been issued.
	pub fn is_authenticated(&self) -> bool {
		self.current.read().is_some()
	}

	/// Standard API headers; `Authorization` is omitted until a credential exists.
	pub fn api_headers(&self) -> Vec<(&'static str, String)> {
		let mut headers = vec![("accept", "application/json".to_owned())];

		if let Some(credential) = self.current.read().as_ref() {
			headers.push(("Authorization", credential.header_value()));
		}

		headers.push(("Content-Type", "application/json".to_owned()));

		headers
	}

	pub(crate) fn replace(&self, credential: Credential) -> Option<Credential> {
		self.current.write().replace(credential)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn headers_follow_the_live_credential() {
		let context = AuthContext::default();

		assert!(!context.is_authenticated());
		assert_eq!(
			context.api_headers(),
			vec![
				("accept", "application/json".to_owned()),
				("Content-Type", "application/json".to_owned())
			],
		);

		assert!(context.replace(Credential::new("first")).is_none());

		let previous = context.replace(Credential::new("second"));

		assert_eq!(previous.map(|c| c.expose().to_owned()), Some("first".into()));
		assert!(context.api_headers().contains(&("Authorization", "Bearer second".to_owned())));
	}
}
