//! Request/response hooks that attach the bearer header and capture renewed tokens.
//!
//! The transport calls [`TokenHooks::on_request`] before sending and
//! [`TokenHooks::on_response`] after receiving. Both run synchronously, touch only the
//! injected [`TokenStore`], and never issue network calls of their own.
//!
//! Any response from the API origin whose body carries a non-empty `token` replaces the
//! stored token, without comparing it to the previous one. That is the whole renewal
//! protocol.

// self
use crate::{
	_prelude::*,
	auth::Token,
	config::{ApiOrigin, SessionConfig},
	obs::{self, HookKind, HookOutcome},
	store::TokenStore,
};

/// Name of the header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// Outbound request as seen by [`TokenHooks::on_request`].
pub trait OutboundRequest {
	/// Absolute target URL.
	fn target(&self) -> &str;

	/// Sets the `Authorization` header to `value`, replacing any existing value.
	///
	/// Returns `false` when the transport cannot represent `value` as a header.
	fn set_authorization(&mut self, value: &str) -> bool;
}

/// Received response as seen by [`TokenHooks::on_response`].
pub trait InboundResponse {
	/// URL of the request that produced this response.
	fn origin_url(&self) -> &str;

	/// Renewed token carried by the body, if any. Empty strings count as absent.
	fn renewed_token(&self) -> Option<&str>;
}

/// Transport-neutral request descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
	/// Absolute target URL.
	pub url: String,
	/// Header map; keys are kept as written by the caller.
	pub headers: BTreeMap<String, String>,
}
impl RequestDescriptor {
	/// Creates a descriptor with no headers.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into(), headers: BTreeMap::new() }
	}

	/// Adds a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Looks up a header by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl OutboundRequest for RequestDescriptor {
	fn target(&self) -> &str {
		&self.url
	}

	fn set_authorization(&mut self, value: &str) -> bool {
		self.headers.retain(|key, _| !key.eq_ignore_ascii_case(AUTHORIZATION));
		self.headers.insert(AUTHORIZATION.into(), value.into());

		true
	}
}

/// Transport-neutral response descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseDescriptor {
	/// URL of the originating request.
	pub url: String,
	/// HTTP status code.
	pub status: u16,
	/// Parsed JSON body; `None` when absent or not JSON.
	pub body: Option<serde_json::Value>,
}
impl ResponseDescriptor {
	/// Creates a descriptor.
	pub fn new(url: impl Into<String>, status: u16, body: Option<serde_json::Value>) -> Self {
		Self { url: url.into(), status, body }
	}
}
impl InboundResponse for ResponseDescriptor {
	fn origin_url(&self) -> &str {
		&self.url
	}

	fn renewed_token(&self) -> Option<&str> {
		body_token(self.body.as_ref())
	}
}

/// Extracts a non-empty string `token` field from a JSON object body.
pub fn body_token(body: Option<&serde_json::Value>) -> Option<&str> {
	body?.get("token")?.as_str().filter(|token| !token.is_empty())
}

/// Pre-send and post-receive hooks bound to one [`TokenStore`] and one [`ApiOrigin`].
#[derive(Clone, Debug)]
pub struct TokenHooks {
	store: TokenStore,
	origin: ApiOrigin,
}
impl TokenHooks {
	/// Binds hooks to an explicit store and origin.
	pub fn new(store: TokenStore, origin: ApiOrigin) -> Self {
		Self { store, origin }
	}

	/// Binds hooks to `store` using the origin from `config`.
	pub fn from_config(store: TokenStore, config: &SessionConfig) -> Self {
		Self::new(store, config.api_origin.clone())
	}

	/// Store the hooks read from and write to.
	pub fn store(&self) -> &TokenStore {
		&self.store
	}

	/// Origin the hooks attach credentials for.
	pub fn origin(&self) -> &ApiOrigin {
		&self.origin
	}

	/// Attaches `Authorization: Bearer <token>` to requests aimed at the API origin.
	///
	/// Requests elsewhere, requests made while no token is stored, and requests whose
	/// token cannot be read or encoded as a header pass through unchanged. This hook never
	/// fails.
	pub fn on_request<R>(&self, mut request: R) -> R
	where
		R: OutboundRequest,
	{
		const KIND: HookKind = HookKind::Request;

		if !self.origin.matches(request.target()) {
			obs::record_hook(KIND, HookOutcome::Skipped, request.target(), None);

			return request;
		}

		let token = match self.store.load() {
			Ok(Some(token)) => token,
			Ok(None) => {
				obs::record_hook(KIND, HookOutcome::Skipped, request.target(), None);

				return request;
			},
			Err(e) => {
				obs::trace_storage_failure("on_request", &e);
				obs::record_hook(KIND, HookOutcome::Failed, request.target(), None);

				return request;
			},
		};
		let outcome = if request.set_authorization(&token.bearer()) {
			HookOutcome::Attached
		} else {
			HookOutcome::Failed
		};

		obs::record_hook(KIND, outcome, request.target(), Some(&token));

		request
	}

	/// Saves a renewed token carried by a response from the API origin.
	///
	/// The response is returned unchanged whether or not a token was saved. Bodies that
	/// are missing, not JSON, or lack a `token` are ignored, whatever the status code.
	/// The only error is a storage failure while saving.
	pub fn on_response<P>(&self, response: P) -> Result<P>
	where
		P: InboundResponse,
	{
		const KIND: HookKind = HookKind::Response;

		if !self.origin.matches(response.origin_url()) {
			obs::record_hook(KIND, HookOutcome::Skipped, response.origin_url(), None);

			return Ok(response);
		}

		let Some(renewed) = response.renewed_token() else {
			obs::record_hook(KIND, HookOutcome::Skipped, response.origin_url(), None);

			return Ok(response);
		};
		let token = Token::new(renewed);

		if let Err(e) = self.store.save(token.clone()) {
			obs::trace_storage_failure("on_response", &e);
			obs::record_hook(KIND, HookOutcome::Failed, response.origin_url(), Some(&token));

			return Err(e.into());
		}

		obs::record_hook(KIND, HookOutcome::Renewed, response.origin_url(), Some(&token));

		Ok(response)
	}
}

#[cfg(feature = "reqwest")]
impl OutboundRequest for reqwest::Request {
	fn target(&self) -> &str {
		self.url().as_str()
	}

	fn set_authorization(&mut self, value: &str) -> bool {
		match reqwest::header::HeaderValue::from_str(value) {
			Ok(mut header) => {
				header.set_sensitive(true);
				self.headers_mut().insert(reqwest::header::AUTHORIZATION, header);

				true
			},
			Err(_) => false,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::{MemoryStore, SlotStore, StoreError};

	const ORIGIN: &str = "https://api.example.com";

	struct UnreadableStore;
	impl SlotStore for UnreadableStore {
		fn read(&self, _: &str) -> Result<Option<String>, StoreError> {
			Err(StoreError::Unavailable { message: "storage disabled".into() })
		}

		fn write(&self, _: &str, _: &str) -> Result<(), StoreError> {
			Err(StoreError::Unavailable { message: "storage disabled".into() })
		}

		fn remove(&self, _: &str) -> Result<(), StoreError> {
			Err(StoreError::Unavailable { message: "storage disabled".into() })
		}
	}

	fn hooks() -> TokenHooks {
		let origin = ApiOrigin::parse(ORIGIN).expect("Origin fixture should parse.");

		TokenHooks::new(TokenStore::in_memory(), origin)
	}

	#[test]
	fn attaches_bearer_only_for_origin_with_token() {
		let hooks = hooks();
		let untouched = RequestDescriptor::new(format!("{ORIGIN}/private"));

		assert_eq!(hooks.on_request(untouched.clone()), untouched);

		hooks.store().save("abc.def.ghi").expect("Saving fixture token should succeed.");

		let attached = hooks.on_request(RequestDescriptor::new(format!("{ORIGIN}/private")));

		assert_eq!(attached.header("authorization"), Some("Bearer abc.def.ghi"));

		let foreign = RequestDescriptor::new("https://cdn.example.com/asset.js");

		assert_eq!(hooks.on_request(foreign.clone()), foreign);
	}

	#[test]
	fn replaces_existing_authorization_header_case_insensitively() {
		let hooks = hooks();

		hooks.store().save("new.token.value").expect("Saving fixture token should succeed.");

		let request = RequestDescriptor::new(format!("{ORIGIN}/me"))
			.with_header("authorization", "Bearer stale")
			.with_header("Accept", "application/json");
		let attached = hooks.on_request(request);

		assert_eq!(attached.headers.len(), 2);
		assert_eq!(attached.header("Authorization"), Some("Bearer new.token.value"));
		assert_eq!(attached.header("accept"), Some("application/json"));
	}

	#[test]
	fn saves_renewed_tokens_from_origin_only() {
		let hooks = hooks();
		let login = ResponseDescriptor::new(
			format!("{ORIGIN}/auth/login"),
			200,
			Some(serde_json::json!({ "token": "abc.def.ghi" })),
		);
		let returned = hooks.on_response(login.clone()).expect("Saving should succeed.");

		assert_eq!(returned, login);
		assert_eq!(
			hooks.store().load().expect("Load should succeed.").map(|t| t.expose().to_owned()),
			Some("abc.def.ghi".into())
		);

		for response in [
			ResponseDescriptor::new(format!("{ORIGIN}/other"), 200, Some(serde_json::json!({}))),
			ResponseDescriptor::new(format!("{ORIGIN}/other"), 200, None),
			ResponseDescriptor::new(format!("{ORIGIN}/other"), 401, Some(serde_json::json!([1]))),
			ResponseDescriptor::new(
				format!("{ORIGIN}/other"),
				200,
				Some(serde_json::json!({ "token": "" })),
			),
			ResponseDescriptor::new(
				format!("{ORIGIN}/other"),
				200,
				Some(serde_json::json!({ "token": 42 })),
			),
			ResponseDescriptor::new(
				"https://elsewhere.example.com/auth/login",
				200,
				Some(serde_json::json!({ "token": "x.y.z" })),
			),
		] {
			hooks.on_response(response).expect("Ignored responses should pass through.");
		}

		assert_eq!(
			hooks.store().load().expect("Load should succeed.").map(|t| t.expose().to_owned()),
			Some("abc.def.ghi".into())
		);
	}

	#[test]
	fn storage_failures_surface_from_on_response() {
		let origin = ApiOrigin::parse(ORIGIN).expect("Origin fixture should parse.");
		let store = TokenStore::new(Arc::new(MemoryStore::with_quota(8)));
		let hooks = TokenHooks::new(store, origin);
		let response = ResponseDescriptor::new(
			format!("{ORIGIN}/auth/login"),
			200,
			Some(serde_json::json!({ "token": "much.too.long" })),
		);
		let err = hooks.on_response(response).expect_err("Quota overflow should surface.");

		assert!(matches!(err, Error::Storage(StoreError::QuotaExceeded { .. })));
	}

	#[test]
	fn unreadable_storage_leaves_requests_unchanged() {
		let origin = ApiOrigin::parse(ORIGIN).expect("Origin fixture should parse.");
		let hooks = TokenHooks::new(TokenStore::new(Arc::new(UnreadableStore)), origin);
		let request = RequestDescriptor::new(format!("{ORIGIN}/private"))
			.with_header("Accept", "application/json");

		assert_eq!(hooks.on_request(request.clone()), request);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn mixed_case_origin_with_default_port_matches_its_endpoints() {
		for raw in ["https://API.example.com", "https://api.example.com:443/api"] {
			let origin = ApiOrigin::parse(raw).expect("Origin fixture should parse.");
			let hooks = TokenHooks::new(TokenStore::in_memory(), origin.clone());

			hooks.store().save("a.b.c").expect("Saving fixture token should succeed.");

			let request = reqwest::Request::new(
				reqwest::Method::GET,
				origin.endpoint("/todos").expect("Endpoint should resolve."),
			);
			let attached = hooks.on_request(request);

			assert_eq!(
				attached
					.headers()
					.get(reqwest::header::AUTHORIZATION)
					.map(|header| header.to_str().expect("Header should be ASCII.")),
				Some("Bearer a.b.c"),
				"origin {raw}"
			);

			let renewal = ResponseDescriptor::new(
				attached.url().as_str(),
				200,
				Some(serde_json::json!({ "token": "d.e.f" })),
			);

			hooks.on_response(renewal).expect("Renewal should be saved.");

			assert_eq!(
				hooks.store().load().expect("Load should succeed.").map(|t| t.expose().to_owned()),
				Some("d.e.f".into())
			);
		}
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn reqwest_requests_get_sensitive_header() {
		let hooks = hooks();

		hooks.store().save("abc.def.ghi").expect("Saving fixture token should succeed.");

		let request = reqwest::Request::new(
			reqwest::Method::GET,
			Url::parse(&format!("{ORIGIN}/me")).expect("Request URL should parse."),
		);
		let attached = hooks.on_request(request);
		let header = attached
			.headers()
			.get(reqwest::header::AUTHORIZATION)
			.expect("Authorization header should be attached.");

		assert_eq!(header.to_str().expect("Header should be ASCII."), "Bearer abc.def.ghi");
		assert!(header.is_sensitive());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn unencodable_tokens_leave_reqwest_requests_unchanged() {
		let hooks = hooks();

		hooks.store().save("line\nbreak").expect("Saving fixture token should succeed.");

		let request = reqwest::Request::new(
			reqwest::Method::GET,
			Url::parse(&format!("{ORIGIN}/me")).expect("Request URL should parse."),
		);
		let passed = hooks.on_request(request);

		assert!(passed.headers().get(reqwest::header::AUTHORIZATION).is_none());
	}
}
