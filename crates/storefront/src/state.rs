//! Store state shared with UI code.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use storefront_state_core::{CheckoutError, Identity, OrderDraft, Product, ProductId};

use crate::cart::CartStore;
use crate::checkout::{self, ContactDetails};
use crate::config::StateConfig;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::storage::{FileStore, KeyValueStore, StorageError, keys, write_text};
use crate::wishlist::WishlistStore;

/// Entry point for cart, wishlist, and identity operations.
///
/// This struct is cheaply cloneable via `Arc`. Views hold one, resolve the
/// identity, and re-read collections after every mutation; there are no
/// change notifications.
pub struct CommerceState<S> {
    inner: Arc<CommerceStateInner<S>>,
}

struct CommerceStateInner<S> {
    store: S,
    placeholder_image: String,
}

impl<S> Clone for CommerceState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for CommerceState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceState")
            .field("store", &self.inner.store)
            .field("placeholder_image", &self.inner.placeholder_image)
            .finish()
    }
}

impl CommerceState<FileStore> {
    /// Open the file-backed store described by `config`.
    #[must_use]
    pub fn open(config: &StateConfig) -> Self {
        let mut store = FileStore::new(&config.state_path);
        if let Some(quota) = config.quota_bytes {
            store = store.with_quota(quota);
        }
        Self::new(store, config.placeholder_image.clone())
    }
}

impl<S: KeyValueStore> CommerceState<S> {
    /// Create a new state over `store`.
    ///
    /// # Arguments
    ///
    /// * `store` - Durable key-value storage
    /// * `placeholder_image` - Cart image for products without images
    #[must_use]
    pub fn new(store: S, placeholder_image: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CommerceStateInner {
                store,
                placeholder_image: placeholder_image.into(),
            }),
        }
    }

    /// Get a reference to the underlying storage.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get the identity resolver.
    #[must_use]
    pub fn identity(&self) -> IdentityResolver<'_, S> {
        IdentityResolver::new(&self.inner.store)
    }

    /// Resolve the current identity. Never fails.
    #[must_use]
    pub fn resolve_identity(&self) -> Identity {
        self.identity().resolve()
    }

    /// Get the cart store.
    #[must_use]
    pub fn cart(&self) -> CartStore<'_, S> {
        CartStore::new(&self.inner.store, &self.inner.placeholder_image)
    }

    /// Get the wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> WishlistStore<'_, S> {
        WishlistStore::new(&self.inner.store)
    }

    /// Store a bearer token, switching the identity to the token's claims.
    ///
    /// The guest cart is left where it is; it is not merged into the
    /// account's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    #[instrument(skip(self, token))]
    pub fn login(&self, token: &SecretString) -> std::result::Result<(), StorageError> {
        write_text(&self.inner.store, keys::TOKEN, token.expose_secret())?;
        tracing::info!("Token stored");
        Ok(())
    }

    /// Forget the bearer token. The identity falls back to the guest id.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> std::result::Result<(), StorageError> {
        self.inner.store.remove(keys::TOKEN)?;
        tracing::info!("Token removed");
        Ok(())
    }

    /// Add a wishlist entry to the cart with quantity one. The entry stays in
    /// the wishlist. Returns `false` if the product is not in the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart cannot be written.
    #[instrument(skip(self, identity), fields(identity = %identity.source()))]
    pub fn move_to_cart(&self, identity: &Identity, product_id: &ProductId) -> Result<bool> {
        let Some(entry) = self.wishlist().find(identity, product_id) else {
            return Ok(false);
        };
        self.cart().add_product(identity, &Product::from(&entry), 1)?;
        Ok(true)
    }

    /// Build an order draft from the cart of `identity`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the order cannot be placed.
    pub fn checkout(
        &self,
        identity: &Identity,
        contact: &ContactDetails,
    ) -> std::result::Result<OrderDraft, CheckoutError> {
        checkout::prepare_order(&self.cart(), identity, contact)
    }

    /// Clear the cart after the order was accepted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart cannot be cleared.
    pub fn complete_checkout(&self, identity: &Identity) -> Result<()> {
        self.cart().clear(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;
    use storefront_state_core::ProductInput;

    use super::*;
    use crate::storage::MemoryStore;

    fn state() -> CommerceState<MemoryStore> {
        CommerceState::new(MemoryStore::new(), "https://via.placeholder.com/150")
    }

    fn token(sub: &str) -> SecretString {
        let body = URL_SAFE_NO_PAD.encode(json!({ "sub": sub }).to_string());
        SecretString::from(format!("eyJhbGciOiJIUzI1NiJ9.{body}.sig"))
    }

    fn product(id: &str) -> ProductInput {
        serde_json::from_value(json!({"productId": id, "price": 8, "labelledPrice": 10}))
            .unwrap()
    }

    #[test]
    fn test_login_switches_identity_without_merge() {
        let state = state();
        let guest = state.resolve_identity();
        state.cart().add(&guest, product("P1"), 1).unwrap();

        state.login(&token("u1")).unwrap();
        let user = state.resolve_identity();
        assert_eq!(user.key(), "u1");
        assert!(state.cart().get(&user).is_empty());

        state.logout().unwrap();
        let back = state.resolve_identity();
        assert_eq!(back, guest);
        assert_eq!(state.cart().get(&back).len(), 1);
    }

    #[test]
    fn test_move_to_cart_keeps_wishlist_entry() {
        let state = state();
        let id = state.resolve_identity();
        state.wishlist().add(&id, product("P1")).unwrap();

        assert!(state.move_to_cart(&id, &ProductId::new("P1")).unwrap());
        assert!(!state.move_to_cart(&id, &ProductId::new("P9")).unwrap());

        let lines = state.cart().get(&id);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().qty, 1);
        assert!(state.wishlist().contains(&id, &ProductId::new("P1")));
    }

    #[test]
    fn test_checkout_then_complete() {
        let state = state();
        state.login(&token("u7")).unwrap();
        let id = state.resolve_identity();
        state.cart().add(&id, product("P1"), 3).unwrap();

        let contact = ContactDetails {
            phone: "0770000000".to_string(),
            address: "1 Lake Rd".to_string(),
        };
        let draft = state.checkout(&id, &contact).unwrap();
        assert_eq!(draft.products.first().unwrap().qty, 3);

        state.complete_checkout(&id).unwrap();
        assert!(state.cart().get(&id).is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let state = state();
        let other = state.clone();
        let id = state.resolve_identity();
        state.cart().add(&id, product("P1"), 1).unwrap();
        assert_eq!(other.cart().get(&id).len(), 1);
    }
}
