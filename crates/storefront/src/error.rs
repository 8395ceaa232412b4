//! Unified error handling for store operations.
//!
//! Provides a `StoreError` type for cart and wishlist mutations. Reads never
//! fail (corrupt data reads as empty), so callers only handle errors from
//! mutations and show [`StoreError::user_message`] as a notice.

use thiserror::Error;

use storefront_state_core::{ProductError, QuantityError};

use crate::storage::StorageError;

/// Error returned by cart and wishlist mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product input is missing required fields.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductError),

    /// The quantity change would leave a line above the maximum quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// A collection could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Short, user-facing description of the failure.
    ///
    /// Internal details (paths, byte counts) are not exposed.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Storage(StorageError::QuotaExceeded { .. }) => {
                "Failed to update: storage is full"
            }
            Self::Storage(_) | Self::Serialize(_) => "Failed to update",
            Self::InvalidProduct(_) => "Invalid product",
            Self::InvalidQuantity(_) => "Invalid quantity",
        }
    }

    /// Whether the failure came from storage rather than bad input.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Serialize(_))
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Add a breadcrumb for a store action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart and
/// wishlist actions leading up to an error. Without an initialized Sentry
/// client this does nothing.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "P1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
