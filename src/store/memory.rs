//! Thread-safe in-memory [`SlotStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SlotStore, StoreError},
};

type SlotMap = Arc<RwLock<HashMap<String, String>>>;

/// Process-local storage medium. Clones share the same slots.
///
/// An optional byte quota (keys plus values) models a medium that can fill up; writes
/// that would exceed it fail with [`StoreError::QuotaExceeded`] and leave the previous
/// contents untouched.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	slots: SlotMap,
	quota: Option<usize>,
}
impl MemoryStore {
	/// Creates an empty store capped at `quota` bytes.
	pub fn with_quota(quota: usize) -> Self {
		Self { slots: Default::default(), quota: Some(quota) }
	}

	/// Number of occupied slots.
	pub fn len(&self) -> usize {
		self.slots.read().len()
	}

	/// Returns `true` when no slot is occupied.
	pub fn is_empty(&self) -> bool {
		self.slots.read().is_empty()
	}

	fn write_now(
		slots: &SlotMap,
		quota: Option<usize>,
		key: &str,
		value: &str,
	) -> Result<(), StoreError> {
		let mut guard = slots.write();

		if let Some(quota) = quota {
			let others: usize = guard
				.iter()
				.filter(|(existing, _)| existing.as_str() != key)
				.map(|(k, v)| k.len() + v.len())
				.sum();
			let required = others + key.len() + value.len();

			if required > quota {
				return Err(StoreError::QuotaExceeded { required, quota });
			}
		}

		guard.insert(key.to_owned(), value.to_owned());

		Ok(())
	}
}
impl SlotStore for MemoryStore {
	fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.slots.read().get(key).cloned())
	}

	fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
		Self::write_now(&self.slots, self.quota, key, value)
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.slots.write().remove(key);

		Ok(())
	}
}
