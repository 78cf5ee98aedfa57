//! Key-value storage backends.
//!
//! A backend is a flat map of string keys to string values, the same shape
//! as browser local storage. [`RecordStore`](crate::RecordStore) layers the
//! typed record collections on top.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, StoreError};

/// A synchronous string key-value store.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the underlying storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails or exceeds a quota.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the underlying storage cannot be written.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Reports backend readiness for health checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend is unavailable.
    fn readiness(&self) -> Result<()> {
        Ok(())
    }
}

/// In-process backend. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once keys plus values
    /// would exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RwLock::default(),
            quota: Some(bytes),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;

        if let Some(limit) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > limit {
                return Err(StoreError::QuotaExceeded { limit });
            }
        }

        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        items.remove(key);
        Ok(())
    }

    fn readiness(&self) -> Result<()> {
        self.items.read().map(|_| ()).map_err(|_| StoreError::Poisoned)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));

        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").unwrap();

        let err = storage.set_item("other", "123456").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 10 }));
        assert_eq!(storage.get_item("other").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345678").unwrap();
        storage.set_item("k", "87654321").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("87654321"));
    }
}
