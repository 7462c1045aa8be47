//! Redacted bearer token wrapper.

// crates.io
use base64::{Engine, prelude::BASE64_STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{Claims, MalformedTokenError, claims},
};

const FINGERPRINT_LEN: usize = 12;

/// Server-issued bearer token, kept out of logs by its formatters.
///
/// The value is opaque to the client: it is stored and replayed verbatim, and only its
/// claims segment is ever decoded. Nothing in this crate mutates a token after receipt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);
impl Token {
	/// Wraps a raw token string without validating it.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value (`Bearer <token>`).
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}

	/// Decodes the claims segment.
	pub fn claims(&self) -> Result<Claims, MalformedTokenError> {
		claims::decode_claims(&self.0)
	}

	/// Short, stable digest used to correlate tokens in logs without exposing them.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());
		let mut encoded = BASE64_STANDARD_NO_PAD.encode(digest);

		encoded.truncate(FINGERPRINT_LEN);

		encoded
	}
}
impl From<String> for Token {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for Token {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Token").field(&"<redacted>").finish()
	}
}
impl Display for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
