//! Claims decoding for three-segment bearer tokens.
//!
//! Only the middle segment is read. The header and signature stay opaque because
//! signature verification belongs to the server that issued the token.

// crates.io
use base64::{
	Engine, alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
// self
use crate::_prelude::*;

// Standard alphabet after the `-`/`_` substitution; padding is optional on the wire.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new()
		.with_decode_padding_mode(DecodePaddingMode::Indifferent)
		.with_decode_allow_trailing_bits(true),
);

/// Failures raised while decoding a token's claims segment.
#[derive(Debug, ThisError)]
pub enum MalformedTokenError {
	/// The token has no second period-separated segment.
	#[error("Token is missing its claims segment.")]
	MissingClaimsSegment,
	/// The claims segment is not valid base64url.
	#[error("Token claims segment is not valid base64url.")]
	Base64 {
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// The decoded bytes are not a JSON claims object.
	#[error("Token claims are not a valid claims object.")]
	Claims {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The claims object is followed by unexpected bytes.
	#[error("Token claims contain trailing data.")]
	TrailingData {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Subject identifier carried in the `id` claim; servers emit either numbers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
	/// Integral identifier (database row id).
	Numeric(i64),
	/// Textual identifier (UUID, slug).
	Text(String),
	/// Any other JSON shape, kept verbatim.
	Other(serde_json::Value),
}
impl From<serde_json::Value> for SubjectId {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::String(id) => Self::Text(id),
			serde_json::Value::Number(ref n) => match n.as_i64() {
				Some(id) => Self::Numeric(id),
				None => Self::Other(value),
			},
			other => Self::Other(other),
		}
	}
}
impl Display for SubjectId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Numeric(id) => write!(f, "{id}"),
			Self::Text(id) => f.write_str(id),
			Self::Other(id) => write!(f, "{id}"),
		}
	}
}

/// Decoded claims payload.
///
/// Any JSON object decodes. `username` is picked up when it is a string, `id` when present
/// and non-null, and `exp` when it is a number (fractional NumericDates are floored). A
/// recognized name holding an unexpected shape stays in [`extra`](Self::extra), so every
/// field the server sent is written back on serialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct Claims {
	/// Display name of the authenticated user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Subject identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<SubjectId>,
	/// Expiry, in whole seconds since the Unix epoch. A token without one never validates.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub exp: Option<i64>,
	/// Unrecognized claims, preserved as-is.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl Claims {
	/// Returns `true` while `instant`, floored to whole seconds, is at or before `exp`.
	///
	/// Claims without `exp` are never valid.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.exp.is_some_and(|exp| unix_seconds(instant) <= exp)
	}

	/// Expiry as an instant, when `exp` is present and within the representable range.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.exp?).ok()
	}
}
impl From<BTreeMap<String, serde_json::Value>> for Claims {
	fn from(mut fields: BTreeMap<String, serde_json::Value>) -> Self {
		let username = match fields.remove("username") {
			Some(serde_json::Value::String(username)) => Some(username),
			Some(other) => {
				fields.insert("username".into(), other);

				None
			},
			None => None,
		};
		let id = match fields.remove("id") {
			None | Some(serde_json::Value::Null) => None,
			Some(id) => Some(SubjectId::from(id)),
		};
		let exp = match fields.remove("exp") {
			Some(serde_json::Value::Number(n)) => numeric_date(&n),
			Some(other) => {
				fields.insert("exp".into(), other);

				None
			},
			None => None,
		};

		Self { username, id, exp, extra: fields }
	}
}

fn numeric_date(n: &serde_json::Number) -> Option<i64> {
	if let Some(seconds) = n.as_i64() {
		return Some(seconds);
	}
	if n.is_u64() {
		return Some(i64::MAX);
	}

	// Float-to-int casts saturate; NaN cannot appear in JSON.
	n.as_f64().map(|seconds| seconds.floor() as i64)
}

/// Decodes the claims segment of `token`.
///
/// The segment is converted from base64url to the standard alphabet (`-` to `+`, `_` to
/// `/`), base64-decoded, then parsed as a JSON object. No I/O, no signature checks.
pub fn decode_claims(token: &str) -> Result<Claims, MalformedTokenError> {
	let segment = token.split('.').nth(1).ok_or(MalformedTokenError::MissingClaimsSegment)?;
	let standard = segment.replace('-', "+").replace('_', "/");
	let bytes = CLAIMS_ENGINE
		.decode(standard.as_bytes())
		.map_err(|source| MalformedTokenError::Base64 { source })?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
	let claims = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| MalformedTokenError::Claims { source })?;

	deserializer.end().map_err(|source| MalformedTokenError::TrailingData { source })?;

	Ok(claims)
}

/// Whole seconds since the Unix epoch, with sub-second precision floored away.
pub fn unix_seconds(instant: OffsetDateTime) -> i64 {
	instant.unix_timestamp()
}
