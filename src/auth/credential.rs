//! Bearer credential wrapper that redacts the token text.

// self
use crate::_prelude::*;

/// Opaque bearer credential issued by the auth service.
///
/// There is no explicit expiry: a stale credential is only noticed when the API answers 401.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	token: String,
	/// Instant the auth response carrying this credential was parsed.
	pub issued_at: OffsetDateTime,
}
impl Credential {
	/// Wraps a freshly issued access token, stamping `issued_at` with the current clock.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self::issued_at(access_token, OffsetDateTime::now_utc())
	}

	/// Wraps an access token issued at `instant`.
	pub fn issued_at(access_token: impl Into<String>, instant: OffsetDateTime) -> Self {
		Self { token: access_token.into(), issued_at: instant }
	}

	/// Returns the raw access token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.token
	}

	/// Formats the `Authorization` header value.
	pub fn header_value(&self) -> String {
		format!("Bearer {}", self.token)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Bearer <redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_redact_and_header_carries_token() {
		let credential = Credential::new("super-secret");

		assert!(!format!("{credential:?}").contains("super-secret"));
		assert_eq!(format!("{credential}"), "Bearer <redacted>");
		assert_eq!(credential.header_value(), "Bearer super-secret");
		assert_eq!(credential.expose(), "super-secret");
	}
}
