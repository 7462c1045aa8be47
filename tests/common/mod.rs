//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// crates.io
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use time::OffsetDateTime;

/// Builds an unsigned three-segment token carrying the given claims.
pub fn mint_token(username: &str, id: i64, exp: i64) -> String {
	let header = BASE64_URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
	let claims = serde_json::json!({
		"username": username,
		"id": id,
		"exp": exp,
		"iat": exp - 3600,
	});
	let claims = BASE64_URL_SAFE_NO_PAD.encode(claims.to_string());

	format!("{header}.{claims}.c2lnbmF0dXJl")
}

/// Current time in whole Unix seconds.
pub fn now_unix() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
