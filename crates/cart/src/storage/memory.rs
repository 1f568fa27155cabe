//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StorageError};

/// In-memory key-value store.
///
/// Clones share the same map, so a clone handed to a second engine sees what
/// the first one wrote. This is how tests simulate a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.inner.lock().map_err(|_| StorageError::Poisoned)?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.read("cart-items").unwrap(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.write("cart-items", "[]").unwrap();
        assert_eq!(other.read("cart-items").unwrap().as_deref(), Some("[]"));

        other.remove("cart-items").unwrap();
        assert!(store.is_empty().unwrap());
    }
}
