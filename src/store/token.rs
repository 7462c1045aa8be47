//! Token lifecycle on top of a single storage slot.

// self
use crate::{
	_prelude::*,
	auth::{Claims, MalformedTokenError, Token, claims},
	obs,
	store::{DEFAULT_SLOT_KEY, MemoryStore, SlotStore, StoreError},
};

/// Client-perceived session state, evaluated lazily on each check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
	/// The slot is empty.
	Unauthenticated,
	/// A token is stored and its `exp` has not passed.
	Active,
	/// A token is stored but its `exp` is in the past.
	Expired,
	/// A value is stored but its claims cannot be decoded or carry no `exp`.
	Malformed,
	/// The storage medium could not be read.
	Unavailable,
}

/// Owner of the persisted token slot.
///
/// Clones share the same medium and slot key, so a store handed to
/// [`TokenHooks`](crate::hooks::TokenHooks) and one kept by the caller observe the same
/// token. Expiry is only evaluated when asked; nothing here runs in the background.
#[derive(Clone)]
pub struct TokenStore {
	slots: Arc<dyn SlotStore>,
	key: Arc<str>,
}
impl TokenStore {
	/// Creates a store over `slots` using [`DEFAULT_SLOT_KEY`].
	pub fn new(slots: Arc<dyn SlotStore>) -> Self {
		Self::with_key(slots, DEFAULT_SLOT_KEY)
	}

	/// Creates a store over `slots` using a custom slot key.
	pub fn with_key(slots: Arc<dyn SlotStore>, key: impl AsRef<str>) -> Self {
		Self { slots, key: Arc::from(key.as_ref()) }
	}

	/// Creates a store backed by a fresh [`MemoryStore`].
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryStore::default()))
	}

	/// Slot key this store reads and writes.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Persists `token`, replacing any previous value.
	///
	/// The token is not inspected; only the server can judge its signature.
	pub fn save(&self, token: impl Into<Token>) -> Result<(), StoreError> {
		let token = token.into();

		self.slots.write(&self.key, token.expose())
	}

	/// Returns the persisted token, if any.
	pub fn load(&self) -> Result<Option<Token>, StoreError> {
		Ok(self.slots.read(&self.key)?.map(Token::new))
	}

	/// Removes the persisted token. Clearing an empty slot succeeds.
	pub fn clear(&self) -> Result<(), StoreError> {
		self.slots.remove(&self.key)
	}

	/// Decodes the claims segment of `token`. Pure; see [`claims::decode_claims`].
	pub fn decode_claims(token: &str) -> Result<Claims, MalformedTokenError> {
		claims::decode_claims(token)
	}

	/// Decodes the claims of the persisted token, if any.
	pub fn claims(&self) -> Result<Option<Claims>> {
		match self.load()? {
			Some(token) => Ok(Some(token.claims()?)),
			None => Ok(None),
		}
	}

	/// Computes the session status at `instant`.
	pub fn status_at(&self, instant: OffsetDateTime) -> SessionStatus {
		let token = match self.load() {
			Ok(Some(token)) => token,
			Ok(None) => return SessionStatus::Unauthenticated,
			Err(e) => {
				obs::trace_storage_failure("status", &e);

				return SessionStatus::Unavailable;
			},
		};

		match token.claims() {
			Ok(claims) if claims.exp.is_none() => SessionStatus::Malformed,
			Ok(claims) if claims.is_valid_at(instant) => SessionStatus::Active,
			Ok(_) => SessionStatus::Expired,
			Err(_) => SessionStatus::Malformed,
		}
	}

	/// Computes the session status against the current UTC clock.
	pub fn status(&self) -> SessionStatus {
		self.status_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if a decodable token is stored and `instant` is at or before its `exp`.
	pub fn is_authenticated_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), SessionStatus::Active)
	}

	/// Returns `true` if the stored token is decodable and not yet expired.
	///
	/// Malformed tokens and unreadable storage both count as unauthenticated.
	pub fn is_authenticated(&self) -> bool {
		self.is_authenticated_at(OffsetDateTime::now_utc())
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore").field("key", &self.key).finish()
	}
}
