//! Per-identity cart store.
//!
//! Each mutation loads the identity's cart, applies the merge rules from
//! [`storefront_state_core::cart`], and writes the whole list back.

use rust_decimal::Decimal;
use tracing::instrument;

use storefront_state_core::cart::{self as rules, CartLine, LineChange};
use storefront_state_core::{Identity, Product, ProductId, ProductInput};

use crate::error::{Result, add_breadcrumb};
use crate::storage::{KeyValueStore, keys, load_collection, save_collection};

/// Cart operations over a key-value store.
#[derive(Debug)]
pub struct CartStore<'a, S: ?Sized> {
    store: &'a S,
    placeholder_image: &'a str,
}

impl<'a, S: KeyValueStore + ?Sized> CartStore<'a, S> {
    /// Create a cart store. `placeholder_image` is used for products without
    /// images.
    #[must_use]
    pub const fn new(store: &'a S, placeholder_image: &'a str) -> Self {
        Self {
            store,
            placeholder_image,
        }
    }

    /// Lines in the cart of `identity`.
    ///
    /// Never fails: unreadable storage and corrupt data read as an empty cart.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Vec<CartLine> {
        load_collection(self.store, &keys::cart(identity)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read cart, showing it empty");
            Vec::new()
        })
    }

    /// Validate `input` and change its quantity by `delta`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidProduct` before touching storage if the
    /// input is incomplete, `StoreError::InvalidQuantity` if the quantity
    /// would exceed the line maximum, or `StoreError::Storage` if the write
    /// fails.
    pub fn add(&self, identity: &Identity, input: ProductInput, delta: i64) -> Result<LineChange> {
        let product = input.validate()?;
        self.add_product(identity, &product, delta)
    }

    /// Change the quantity of `product` by `delta`.
    ///
    /// Positive deltas add (creating the line if needed), negative deltas
    /// subtract, and a line that drops below one is removed. A non-positive
    /// delta for a product not in the cart does nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidQuantity` without writing if the quantity
    /// would exceed the line maximum, or `StoreError::Storage` if the cart
    /// cannot be read or written.
    #[instrument(
        skip(self, identity, product),
        fields(identity = %identity.source(), product_id = %product.product_id)
    )]
    pub fn add_product(
        &self,
        identity: &Identity,
        product: &Product,
        delta: i64,
    ) -> Result<LineChange> {
        let key = keys::cart(identity);
        let mut lines: Vec<CartLine> = load_collection(self.store, &key)?;

        let change = rules::apply_delta(&mut lines, product, delta, self.placeholder_image)?;
        if !change.is_mutation() {
            tracing::debug!("Nothing to remove, cart unchanged");
            return Ok(change);
        }

        save_collection(self.store, &key, &lines)?;
        tracing::debug!(?change, "Cart updated");
        add_breadcrumb(
            "cart",
            match change {
                LineChange::Inserted { .. } => "Added to cart",
                LineChange::Removed => "Removed from cart",
                LineChange::Updated { .. } | LineChange::Unchanged => "Cart quantity changed",
            },
            Some(&[("product_id", product.product_id.as_str())]),
        );
        Ok(change)
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    ///
    /// Removing a product that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart cannot be read or written.
    #[instrument(skip(self, identity), fields(identity = %identity.source()))]
    pub fn remove(&self, identity: &Identity, product_id: &ProductId) -> Result<bool> {
        let key = keys::cart(identity);
        let mut lines: Vec<CartLine> = load_collection(self.store, &key)?;

        if !rules::remove_line(&mut lines, product_id) {
            return Ok(false);
        }

        save_collection(self.store, &key, &lines)?;
        tracing::debug!("Removed cart line");
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(true)
    }

    /// Empty the cart of `identity`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart cannot be deleted.
    #[instrument(skip(self, identity), fields(identity = %identity.source()))]
    pub fn clear(&self, identity: &Identity) -> Result<()> {
        self.store.remove(&keys::cart(identity))?;
        tracing::debug!("Cart cleared");
        Ok(())
    }

    /// Sum of `price * qty` over the cart. Zero for an empty cart.
    #[must_use]
    pub fn total(&self, identity: &Identity) -> Decimal {
        rules::total(&self.get(identity))
    }

    /// Number of items in the cart (sum of quantities).
    #[must_use]
    pub fn item_count(&self, identity: &Identity) -> u64 {
        rules::item_count(&self.get(identity))
    }
}
