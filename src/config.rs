//! Session configuration: the protected API origin, the token slot key, and auth endpoints.

// self
use crate::{_prelude::*, store::DEFAULT_SLOT_KEY};

/// Default registration endpoint path, relative to the API origin.
pub const DEFAULT_REGISTER_PATH: &str = "/auth/register";
/// Default login endpoint path, relative to the API origin.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Errors raised while constructing or validating a [`SessionConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum SessionConfigError {
	/// The API origin is not a parseable absolute URL.
	#[error("API origin `{origin}` is not a valid URL.")]
	InvalidOrigin {
		/// Origin string that failed to parse.
		origin: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The API origin uses a scheme other than `http` or `https`.
	#[error("API origin must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// The API origin carries a query string or fragment.
	#[error("API origin `{origin}` must not contain a query or fragment.")]
	OriginHasQuery {
		/// Rejected origin.
		origin: String,
	},
	/// The slot key is empty or contains whitespace.
	#[error("Slot key `{key}` must be non-empty and free of whitespace.")]
	InvalidSlotKey {
		/// Rejected key.
		key: String,
	},
	/// An endpoint path does not start with `/`.
	#[error("The {endpoint} path must start with '/': {path}.")]
	InvalidPath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Rejected path.
		path: String,
	},
}

/// Base URL prefix identifying the protected backend.
///
/// Matching is a plain string prefix test against the normalized URL (lowercase host, no
/// default port) with any trailing `/` removed, so `https://API.example.com:443/` matches
/// `https://api.example.com/auth/login`. Request URLs built through [`Url`] serialize the
/// same way.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiOrigin {
	prefix: String,
	url: Url,
}
impl ApiOrigin {
	/// Parses and validates an origin.
	pub fn parse(origin: impl AsRef<str>) -> Result<Self, SessionConfigError> {
		let raw = origin.as_ref().trim();
		let url = Url::parse(raw).map_err(|source| SessionConfigError::InvalidOrigin {
			origin: raw.to_owned(),
			source,
		})?;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(SessionConfigError::UnsupportedScheme { scheme: url.scheme().to_owned() });
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(SessionConfigError::OriginHasQuery { origin: raw.to_owned() });
		}

		let prefix = url.as_str().trim_end_matches('/').to_owned();

		Ok(Self { prefix, url })
	}

	/// Returns `true` when `target` starts with this origin.
	pub fn matches(&self, target: &str) -> bool {
		target.starts_with(&self.prefix)
	}

	/// Builds the absolute URL for `path` (which must start with `/`).
	pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
		Url::parse(&format!("{}{path}", self.prefix))
	}

	/// Prefix string used for matching.
	pub fn as_str(&self) -> &str {
		&self.prefix
	}

	/// Parsed form of the origin.
	pub fn url(&self) -> &Url {
		&self.url
	}
}
impl Debug for ApiOrigin {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ApiOrigin({})", self.prefix)
	}
}
impl Display for ApiOrigin {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.prefix)
	}
}
impl FromStr for ApiOrigin {
	type Err = SessionConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Immutable session configuration consumed by the hooks and the session client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
	/// Protected backend that receives the bearer header.
	pub api_origin: ApiOrigin,
	/// Storage slot holding the token.
	pub slot_key: String,
	/// Registration endpoint path.
	pub register_path: String,
	/// Login endpoint path.
	pub login_path: String,
}
impl SessionConfig {
	/// Creates a new builder for the provided API origin.
	pub fn builder(api_origin: impl Into<String>) -> SessionConfigBuilder {
		SessionConfigBuilder::new(api_origin)
	}

	fn validate(&self) -> Result<(), SessionConfigError> {
		if self.slot_key.is_empty() || self.slot_key.chars().any(char::is_whitespace) {
			return Err(SessionConfigError::InvalidSlotKey { key: self.slot_key.clone() });
		}

		validate_path("register", &self.register_path)?;
		validate_path("login", &self.login_path)?;

		Ok(())
	}
}

/// Builder for [`SessionConfig`] values.
#[derive(Debug)]
pub struct SessionConfigBuilder {
	api_origin: String,
	slot_key: String,
	register_path: String,
	login_path: String,
}
impl SessionConfigBuilder {
	/// Creates a builder seeded with the API origin and default slot/endpoint names.
	pub fn new(api_origin: impl Into<String>) -> Self {
		Self {
			api_origin: api_origin.into(),
			slot_key: DEFAULT_SLOT_KEY.into(),
			register_path: DEFAULT_REGISTER_PATH.into(),
			login_path: DEFAULT_LOGIN_PATH.into(),
		}
	}

	/// Overrides the storage slot key.
	pub fn slot_key(mut self, key: impl Into<String>) -> Self {
		self.slot_key = key.into();

		self
	}

	/// Overrides the registration endpoint path.
	pub fn register_path(mut self, path: impl Into<String>) -> Self {
		self.register_path = path.into();

		self
	}

	/// Overrides the login endpoint path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SessionConfig, SessionConfigError> {
		let config = SessionConfig {
			api_origin: ApiOrigin::parse(&self.api_origin)?,
			slot_key: self.slot_key,
			register_path: self.register_path,
			login_path: self.login_path,
		};

		config.validate()?;

		Ok(config)
	}
}

fn validate_path(endpoint: &'static str, path: &str) -> Result<(), SessionConfigError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(SessionConfigError::InvalidPath { endpoint, path: path.to_owned() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_applies_defaults() {
		let config = SessionConfig::builder("https://api.example.com")
			.build()
			.expect("Default configuration should build.");

		assert_eq!(config.api_origin.as_str(), "https://api.example.com");
		assert_eq!(config.slot_key, "token");
		assert_eq!(config.register_path, "/auth/register");
		assert_eq!(config.login_path, "/auth/login");
	}

	#[test]
	fn origin_prefix_ignores_trailing_slash() {
		let origin =
			ApiOrigin::parse("https://api.example.com/").expect("Origin fixture should parse.");

		assert!(origin.matches("https://api.example.com/auth/login"));
		assert!(origin.matches("https://api.example.com"));
		assert!(!origin.matches("https://other.example.com/auth/login"));
		assert!(!origin.matches("http://api.example.com/auth/login"));
		assert_eq!(
			origin.endpoint("/auth/login").expect("Endpoint should resolve.").as_str(),
			"https://api.example.com/auth/login"
		);
	}

	#[test]
	fn origin_with_path_prefix_matches_only_below_it() {
		let origin: ApiOrigin =
			"http://localhost:8080/api".parse().expect("Origin fixture should parse.");

		assert!(origin.matches("http://localhost:8080/api/users"));
		assert!(!origin.matches("http://localhost:8080/health"));
		assert_eq!(origin.url().port(), Some(8080));
	}

	#[test]
	fn origin_prefix_is_normalized_like_request_urls() {
		for raw in
			["https://API.Example.com", "https://api.example.com:443", "HTTPS://api.example.com/"]
		{
			let origin = ApiOrigin::parse(raw).expect("Origin fixture should parse.");
			let endpoint = origin.endpoint("/todos").expect("Endpoint should resolve.");

			assert_eq!(origin.as_str(), "https://api.example.com", "normalizing {raw}");
			assert!(origin.matches(endpoint.as_str()), "{raw} should match its own endpoints");
		}

		let with_path = ApiOrigin::parse("https://api.example.com:443/api")
			.expect("Origin fixture should parse.");

		assert_eq!(with_path.as_str(), "https://api.example.com/api");
		assert!(with_path.matches("https://api.example.com/api/todos"));
	}

	#[test]
	fn builder_rejects_invalid_values() {
		assert!(matches!(
			SessionConfig::builder("not a url").build(),
			Err(SessionConfigError::InvalidOrigin { .. })
		));
		assert!(matches!(
			SessionConfig::builder("ftp://files.example.com").build(),
			Err(SessionConfigError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			SessionConfig::builder("https://api.example.com/?v=1").build(),
			Err(SessionConfigError::OriginHasQuery { .. })
		));
		assert!(matches!(
			SessionConfig::builder("https://api.example.com").slot_key("my token").build(),
			Err(SessionConfigError::InvalidSlotKey { .. })
		));
		assert!(matches!(
			SessionConfig::builder("https://api.example.com").login_path("auth/login").build(),
			Err(SessionConfigError::InvalidPath { endpoint: "login", .. })
		));
	}
}
