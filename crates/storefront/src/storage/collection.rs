//! Loading and saving JSON array collections.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{KeyValueStore, StorageError};
use crate::error::StoreError;

/// Load the JSON array stored under `key`.
///
/// A missing key is an empty collection. Content that is not a JSON array is
/// corrupt: it is logged, replaced by an empty array on a best-effort basis,
/// and read as empty. Inside an array, elements that do not decode as `T`
/// are skipped and the rest are kept; the next save drops them for good.
///
/// # Errors
///
/// Returns an error only if the backend itself cannot be read.
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };

    let elements = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(elements)) => elements,
        Ok(other) => {
            reset_corrupt(store, key, &format!("expected an array, found {}", kind(&other)));
            return Ok(Vec::new());
        }
        Err(e) => {
            reset_corrupt(store, key, &e.to_string());
            return Ok(Vec::new());
        }
    };

    let stored = elements.len();
    let items: Vec<T> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect();
    if items.len() != stored {
        tracing::warn!(
            key,
            skipped = stored - items.len(),
            "Skipped malformed entries in stored collection"
        );
    }
    Ok(items)
}

fn reset_corrupt<S: KeyValueStore + ?Sized>(store: &S, key: &str, reason: &str) {
    tracing::warn!(key, reason, "Corrupt collection in storage, resetting to empty");
    if let Err(e) = store.set(key, "[]") {
        tracing::warn!(key, error = %e, "Failed to reset corrupt collection");
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Persist `items` as a JSON array under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(items)?;
    store.set(key, &encoded)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storefront_state_core::CartLine;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_missing_key_is_empty_without_write() {
        let store = MemoryStore::new();
        let items: Vec<u32> = load_collection(&store, "cart_x").unwrap();
        assert!(items.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_value_is_reset() {
        let store = MemoryStore::new();
        store.set("cart_x", "{\"not\": \"an array\"}").unwrap();
        let items: Vec<u32> = load_collection(&store, "cart_x").unwrap();
        assert!(items.is_empty());
        assert_eq!(store.get("cart_x").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_malformed_elements_are_skipped_not_reset() {
        let store = MemoryStore::new();
        let stored = r#"[{"productId":"P1","qty":1},{"productId":7,"qty":2},{"qty":3},{"productId":"P2","qty":4}]"#;
        store.set("cart_x", stored).unwrap();

        let lines: Vec<CartLine> = load_collection(&store, "cart_x").unwrap();
        let ids: Vec<&str> = lines.iter().map(|line| line.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
        assert_eq!(store.get("cart_x").unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save_collection(&store, "k", &[1_u32, 2, 3]).unwrap();
        let items: Vec<u32> = load_collection(&store, "k").unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }
}
