//! Durable key-value storage port.
//!
//! The cart engine never touches the filesystem directly. It reads and writes
//! one text value under [`CART_STORAGE_KEY`](crate::CART_STORAGE_KEY) through
//! a [`KeyValueStore`], which callers inject.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the stored value failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be used by this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Synchronous text key-value store.
///
/// Writes must be durable by the time `write` returns. There is no locking
/// between processes sharing a backend; the last writer wins.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be persisted.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
