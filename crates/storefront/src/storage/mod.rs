//! Durable key-value storage.
//!
//! The store only needs string keys and JSON text values, the same contract
//! browser local storage offers. Backends:
//!
//! - [`MemoryStore`] - process-local map, used in tests
//! - [`FileStore`] - single JSON document on disk
//!
//! # Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `token` | bearer token (read-only for the store) |
//! | `guest_id` | generated guest identifier |
//! | `cart_<identity>` | JSON array of cart lines |
//! | `wishlist_<identity>` | JSON array of wishlist entries |

mod collection;
mod file;
pub mod keys;
mod memory;

use std::collections::BTreeMap;
use std::fmt::Debug;

use thiserror::Error;

pub use collection::{load_collection, save_collection};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing would exceed the configured quota.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Bytes the store would occupy after the write.
        needed: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file exists but is not a key-value document.
    #[error("storage file is unreadable: {0}")]
    Unreadable(#[source] serde_json::Error),

    /// Storage cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage.
///
/// All methods take `&self`; implementations use interior mutability.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read a value. Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or exceeds the quota. The
    /// previous value is left in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Bytes used by a set of entries, counted as key plus value length.
fn usage<'a>(entries: impl IntoIterator<Item = (&'a String, &'a String)>) -> usize {
    entries
        .into_iter()
        .map(|(key, value)| key.len() + value.len())
        .sum()
}

/// Insert into `entries` unless the result would exceed `quota`.
fn insert_within_quota(
    entries: &mut BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    if let Some(limit) = quota {
        let current = usage(entries.iter());
        let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
        let needed = current - replaced + key.len() + value.len();
        if needed > limit {
            return Err(StorageError::QuotaExceeded { needed, limit });
        }
    }
    entries.insert(key.to_owned(), value.to_owned());
    Ok(())
}

/// Read a plain text value such as the token or guest id.
///
/// Values written by this crate are JSON strings; values written by other
/// clients (the login flow stores the token unquoted) are taken verbatim.
/// Blank values read as `None`.
///
/// # Errors
///
/// Returns an error if the backend cannot be read.
pub fn read_text<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<String>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let text = serde_json::from_str::<String>(&raw).unwrap_or(raw);
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_owned()))
}

/// Write a plain text value as a JSON string.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_text<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    let encoded = serde_json::Value::String(value.to_owned()).to_string();
    store.set(key, &encoded)
}
