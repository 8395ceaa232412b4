//! Per-identity wishlist store.

use tracing::instrument;

use storefront_state_core::{Identity, Product, ProductId, ProductInput, WishlistEntry};

use crate::error::{Result, add_breadcrumb};
use crate::storage::{KeyValueStore, keys, load_collection, save_collection};

/// Outcome of adding a product to a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAdd {
    /// The product was appended.
    Added,
    /// The product was already present; nothing changed.
    AlreadyPresent,
}

impl WishlistAdd {
    /// Whether the product was newly added.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Wishlist operations over a key-value store.
#[derive(Debug)]
pub struct WishlistStore<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> WishlistStore<'a, S> {
    /// Create a wishlist store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Entries in the wishlist of `identity`.
    ///
    /// Never fails: unreadable storage and corrupt data read as empty.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Vec<WishlistEntry> {
        load_collection(self.store, &keys::wishlist(identity)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read wishlist, showing it empty");
            Vec::new()
        })
    }

    /// Validate `input` and add it to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidProduct` if the input is incomplete, or
    /// `StoreError::Storage` if the write fails.
    pub fn add(&self, identity: &Identity, input: ProductInput) -> Result<WishlistAdd> {
        let product = input.validate()?;
        self.add_product(identity, &product)
    }

    /// Add `product` unless an entry with the same id exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the wishlist cannot be read or written.
    #[instrument(
        skip(self, identity, product),
        fields(identity = %identity.source(), product_id = %product.product_id)
    )]
    pub fn add_product(&self, identity: &Identity, product: &Product) -> Result<WishlistAdd> {
        let key = keys::wishlist(identity);
        let mut entries: Vec<WishlistEntry> = load_collection(self.store, &key)?;

        if entries
            .iter()
            .any(|entry| entry.product_id == product.product_id)
        {
            return Ok(WishlistAdd::AlreadyPresent);
        }

        entries.push(WishlistEntry::from(product));
        save_collection(self.store, &key, &entries)?;
        tracing::debug!("Added to wishlist");
        add_breadcrumb(
            "wishlist",
            "Added to wishlist",
            Some(&[("product_id", product.product_id.as_str())]),
        );
        Ok(WishlistAdd::Added)
    }

    /// Remove the entry for `product_id` and return the remaining entries.
    ///
    /// Removing an absent product is a no-op and does not write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the wishlist cannot be read or written.
    #[instrument(skip(self, identity), fields(identity = %identity.source()))]
    pub fn remove(&self, identity: &Identity, product_id: &ProductId) -> Result<Vec<WishlistEntry>> {
        let key = keys::wishlist(identity);
        let mut entries: Vec<WishlistEntry> = load_collection(self.store, &key)?;

        let before = entries.len();
        entries.retain(|entry| &entry.product_id != product_id);
        if entries.len() != before {
            save_collection(self.store, &key, &entries)?;
            tracing::debug!("Removed from wishlist");
            add_breadcrumb(
                "wishlist",
                "Removed from wishlist",
                Some(&[("product_id", product_id.as_str())]),
            );
        }
        Ok(entries)
    }

    /// Whether `product_id` is in the wishlist.
    #[must_use]
    pub fn contains(&self, identity: &Identity, product_id: &ProductId) -> bool {
        self.get(identity)
            .iter()
            .any(|entry| &entry.product_id == product_id)
    }

    /// Look up a single entry.
    #[must_use]
    pub fn find(&self, identity: &Identity, product_id: &ProductId) -> Option<WishlistEntry> {
        self.get(identity)
            .into_iter()
            .find(|entry| &entry.product_id == product_id)
    }

    /// Add the product if absent, remove it if present. Returns whether it is
    /// in the wishlist afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidProduct` if the input is incomplete, or
    /// `StoreError::Storage` if the write fails.
    pub fn toggle(&self, identity: &Identity, input: ProductInput) -> Result<bool> {
        let product = input.validate()?;
        if self.contains(identity, &product.product_id) {
            self.remove(identity, &product.product_id)?;
            Ok(false)
        } else {
            self.add_product(identity, &product)?;
            Ok(true)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use storefront_state_core::GuestId;

    use super::*;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;

    fn input(id: &str) -> ProductInput {
        serde_json::from_value(json!({
            "productId": id,
            "name": "Night Cream",
            "price": 30,
            "labelledPrice": 35
        }))
        .unwrap()
    }

    fn guest() -> Identity {
        Identity::guest(GuestId::new("guest_w"))
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = MemoryStore::new();
        let wishlist = WishlistStore::new(&store);
        let id = guest();

        assert_eq!(wishlist.add(&id, input("P1")).unwrap(), WishlistAdd::Added);
        assert_eq!(
            wishlist.add(&id, input("P1")).unwrap(),
            WishlistAdd::AlreadyPresent
        );
        assert_eq!(wishlist.get(&id).len(), 1);
        assert!(wishlist.get(&id).first().unwrap().images.is_empty());
    }

    #[test]
    fn test_remove_returns_remaining() {
        let store = MemoryStore::new();
        let wishlist = WishlistStore::new(&store);
        let id = guest();
        wishlist.add(&id, input("P1")).unwrap();
        wishlist.add(&id, input("P2")).unwrap();

        let remaining = wishlist.remove(&id, &ProductId::new("P1")).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.first().unwrap().product_id.as_str(), "P2");

        let unchanged = wishlist.remove(&id, &ProductId::new("missing")).unwrap();
        assert_eq!(unchanged, remaining);
    }

    #[test]
    fn test_contains_and_find() {
        let store = MemoryStore::new();
        let wishlist = WishlistStore::new(&store);
        let id = guest();
        wishlist.add(&id, input("P1")).unwrap();

        assert!(wishlist.contains(&id, &ProductId::new("P1")));
        assert!(!wishlist.contains(&id, &ProductId::new("P2")));
        assert_eq!(
            wishlist.find(&id, &ProductId::new("P1")).unwrap().name,
            "Night Cream"
        );
    }

    #[test]
    fn test_toggle() {
        let store = MemoryStore::new();
        let wishlist = WishlistStore::new(&store);
        let id = guest();

        assert!(wishlist.toggle(&id, input("P1")).unwrap());
        assert!(!wishlist.toggle(&id, input("P1")).unwrap());
        assert!(wishlist.get(&id).is_empty());
    }

    #[test]
    fn test_invalid_product() {
        let store = MemoryStore::new();
        let wishlist = WishlistStore::new(&store);
        let err = wishlist
            .add(&guest(), ProductInput::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidProduct(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_wishlist_reads_empty() {
        let store = MemoryStore::new();
        let id = guest();
        store.set(&keys::wishlist(&id), "42").unwrap();
        assert!(WishlistStore::new(&store).get(&id).is_empty());
    }
}
