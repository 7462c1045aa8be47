//! Storage contracts for the token slot and built-in storage media.
//!
//! A [`SlotStore`] is the persistence medium: a keyed set of string slots, in the spirit
//! of browser local storage. [`TokenStore`] sits on top of one slot and owns the token
//! lifecycle (save, load, clear, claims decoding, and lazy expiry checks).

pub mod file;
pub mod memory;
pub mod token;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use token::{SessionStatus, TokenStore};

// self
use crate::_prelude::*;

/// Well-known slot name used when the configuration does not override it.
pub const DEFAULT_SLOT_KEY: &str = "token";

/// Persistence medium holding string slots by key.
///
/// Calls are synchronous. Request hooks read the slot inline, so implementations must
/// return promptly and must not perform network I/O.
pub trait SlotStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

	/// Removes `key`. Removing a missing key succeeds.
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`SlotStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Writing the slot would exceed the medium's capacity.
	#[error("Storage quota exceeded: {required} bytes required, {quota} available.")]
	QuotaExceeded {
		/// Bytes the medium would hold after the write.
		required: usize,
		/// Configured capacity in bytes.
		quota: usize,
	},
	/// The medium is disabled or otherwise unreachable.
	#[error("Storage is unavailable: {message}.")]
	Unavailable {
		/// Human-readable error payload.
		message: String,
	},
}
