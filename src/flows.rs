//! Registration, login, and logout flows on top of [`SessionClient`].
//!
//! Registration and login post `{username, password}` and expect `{token, message?}`.
//! The token is persisted by the response hook before the flow parses the body, so a
//! successful call leaves the session authenticated even if the caller drops the result.
//! A 2xx body whose `token` is missing or empty fails with [`Error::ResponseParse`]; the
//! hook ignored it, so whatever token was stored before is still there.

// self
use crate::{
	_prelude::*,
	auth::{AuthResponse, Credentials},
	http::SessionClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const DEFAULT_REJECTION: &str = "Request was not accepted";

impl SessionClient {
	/// Creates an account and stores the issued token.
	pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse> {
		self.authenticate(FlowKind::Register, &self.config.register_path, credentials).await
	}

	/// Logs in and stores the issued token.
	pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
		self.authenticate(FlowKind::Login, &self.config.login_path, credentials).await
	}

	/// Forgets the stored token. The server is not contacted.
	pub fn logout(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Logout;

		let _span = FlowSpan::new(KIND, "logout").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		match self.store().clear() {
			Ok(()) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);

				Ok(())
			},
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				Err(e.into())
			},
		}
	}

	/// Returns `true` if the stored token is decodable and not yet expired.
	pub fn is_authenticated(&self) -> bool {
		self.store().is_authenticated()
	}

	async fn authenticate(
		&self,
		kind: FlowKind,
		path: &str,
		credentials: &Credentials,
	) -> Result<AuthResponse> {
		let span = FlowSpan::new(kind, "authenticate");

		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.http.post(self.endpoint(path)?).json(credentials).build()?;
				let response = self.dispatch(request).await?;

				if !response.is_success() {
					return Err(Error::Rejected {
						status: response.status,
						message: response.message().unwrap_or(DEFAULT_REJECTION).to_owned(),
					});
				}

				response.json::<AuthResponse>()
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
		}

		result
	}
}
