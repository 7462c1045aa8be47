//! Request and response bodies exchanged with the registration and login endpoints.

// crates.io
use serde::{
	Deserializer,
	de::{Error as _, Unexpected},
};
// self
use crate::{_prelude::*, auth::Token};

/// Username/password pair posted to the registration and login endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Account name.
	pub username: String,
	/// Account password; never logged.
	pub password: String,
}
impl Credentials {
	/// Creates a credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into() }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Success body returned by the registration and login endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
	/// Freshly issued token; an empty string fails to parse.
	#[serde(deserialize_with = "non_empty_token")]
	pub token: Token,
	/// Optional human-readable status message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

fn non_empty_token<'de, D>(deserializer: D) -> Result<Token, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	if raw.is_empty() {
		return Err(D::Error::invalid_value(Unexpected::Str(&raw), &"a non-empty token"));
	}

	Ok(Token::new(raw))
}
