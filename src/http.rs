//! Reqwest transport that routes every request through [`TokenHooks`].
//!
//! [`SessionClient::send`] runs `on_request`, executes the request, buffers the body,
//! parses it as JSON when possible, then runs `on_response` before handing the
//! [`ApiResponse`] back. Non-2xx statuses are returned as responses, not errors, so callers
//! decide how to treat a 401.

// crates.io
use reqwest::{Method, Request, RequestBuilder, header::HeaderMap};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::SessionConfig,
	hooks::{InboundResponse, TokenHooks, body_token},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{MemoryStore, SlotStore, TokenStore},
};

/// Buffered response returned after the hooks ran.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// URL of the originating request.
	pub url: Url,
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Parsed JSON body; `None` when the body is empty or not JSON.
	pub body: Option<serde_json::Value>,
	/// Raw body bytes.
	pub bytes: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Server-supplied `message` field, if present.
	pub fn message(&self) -> Option<&str> {
		self.body.as_ref()?.get("message")?.as_str()
	}

	/// Deserializes the raw body into `T`.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::ResponseParse { source, status: self.status })
	}
}
impl InboundResponse for ApiResponse {
	fn origin_url(&self) -> &str {
		self.url.as_str()
	}

	fn renewed_token(&self) -> Option<&str> {
		body_token(self.body.as_ref())
	}
}

/// HTTP client bound to one API origin and one token slot.
///
/// Redirect, timeout, and TLS behavior come from the wrapped [`ReqwestClient`].
#[derive(Clone)]
pub struct SessionClient {
	pub(crate) http: ReqwestClient,
	pub(crate) config: SessionConfig,
	pub(crate) hooks: TokenHooks,
}
impl SessionClient {
	/// Creates a client with a default reqwest transport over the provided storage medium.
	pub fn new(config: SessionConfig, slots: Arc<dyn SlotStore>) -> Self {
		Self::with_client(ReqwestClient::default(), config, slots)
	}

	/// Creates a client that keeps its token in process memory.
	pub fn in_memory(config: SessionConfig) -> Self {
		Self::new(config, Arc::new(MemoryStore::default()))
	}

	/// Creates a client that reuses a caller-provided reqwest transport.
	pub fn with_client(
		client: ReqwestClient,
		config: SessionConfig,
		slots: Arc<dyn SlotStore>,
	) -> Self {
		let store = TokenStore::with_key(slots, &config.slot_key);
		let hooks = TokenHooks::from_config(store, &config);

		Self { http: client, config, hooks }
	}

	/// Session configuration.
	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	/// Token store shared with the hooks.
	pub fn store(&self) -> &TokenStore {
		self.hooks.store()
	}

	/// Hooks applied to every request.
	pub fn hooks(&self) -> &TokenHooks {
		&self.hooks
	}

	/// Resolves `path` against the API origin.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		self.config
			.api_origin
			.endpoint(path)
			.map_err(|source| Error::InvalidEndpoint { path: path.to_owned(), source })
	}

	/// Starts a request to `path` under the API origin.
	pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
		Ok(self.http.request(method, self.endpoint(path)?))
	}

	/// Sends a GET to `path` under the API origin.
	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		let request = self.request(Method::GET, path)?.build()?;

		self.send(request).await
	}

	/// Sends `request` through the hooks. Requests outside the API origin are sent as-is.
	pub async fn send(&self, request: Request) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.dispatch(request)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	pub(crate) async fn dispatch(&self, request: Request) -> Result<ApiResponse> {
		let request = self.hooks.on_request(request);
		let url = request.url().to_owned();
		let response = self.http.execute(request).await?;
		let status = response.status().as_u16();
		let headers = response.headers().to_owned();
		let bytes = response.bytes().await?.to_vec();
		let body = serde_json::from_slice(&bytes).ok();

		self.hooks.on_response(ApiResponse { url, status, headers, body, bytes })
	}
}
impl Debug for SessionClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionClient")
			.field("config", &self.config)
			.field("store", self.hooks.store())
			.finish()
	}
}
