//! Wishlist entry type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount;
use super::id::ProductId;
use super::product::Product;

/// A product saved to a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "amount::deserialize_lenient",
        serialize_with = "amount::serialize"
    )]
    pub price: Decimal,
    #[serde(
        default,
        deserialize_with = "amount::deserialize_lenient",
        serialize_with = "amount::serialize"
    )]
    pub labelled_price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<&Product> for WishlistEntry {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            price: product.price,
            labelled_price: product.labelled_price,
            images: product.images.clone(),
        }
    }
}

impl From<&WishlistEntry> for Product {
    fn from(entry: &WishlistEntry) -> Self {
        Self {
            product_id: entry.product_id.clone(),
            name: entry.name.clone(),
            price: entry.price,
            labelled_price: entry.labelled_price,
            images: entry.images.clone(),
        }
    }
}
