//! Product input accepted by the cart and wishlist.
//!
//! Products arrive from the catalog API as loosely-shaped JSON. [`ProductInput`]
//! captures that shape with every field optional; [`ProductInput::validate`]
//! turns it into a [`Product`] with the required fields guaranteed present.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount;
use super::id::ProductId;

/// Errors that can occur when validating a [`ProductInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product id is missing or blank.
    #[error("product id is required")]
    MissingProductId,
    /// The selling price is missing or not numeric.
    #[error("price is required for product {0}")]
    MissingPrice(ProductId),
    /// The labelled (list) price is missing or not numeric.
    #[error("labelled price is required for product {0}")]
    MissingLabelledPrice(ProductId),
    /// A price is below zero.
    #[error("price cannot be negative for product {0}")]
    NegativePrice(ProductId),
}

/// Loosely-typed product as received from the catalog.
///
/// Unknown fields (description, stock, category, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "amount::deserialize_optional")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::deserialize_optional")]
    pub labelled_price: Option<Decimal>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl ProductInput {
    /// Validate the input into a [`Product`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The product id is missing or blank
    /// - The price or labelled price is missing or not numeric
    /// - Either price is negative
    pub fn validate(self) -> Result<Product, ProductError> {
        let product_id = self
            .product_id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .map(ProductId::new)
            .ok_or(ProductError::MissingProductId)?;

        let price = self
            .price
            .ok_or_else(|| ProductError::MissingPrice(product_id.clone()))?;
        let labelled_price = self
            .labelled_price
            .ok_or_else(|| ProductError::MissingLabelledPrice(product_id.clone()))?;

        if price.is_sign_negative() || labelled_price.is_sign_negative() {
            return Err(ProductError::NegativePrice(product_id));
        }

        Ok(Product {
            product_id,
            name: self.name.unwrap_or_default(),
            price,
            labelled_price,
            images: self
                .images
                .unwrap_or_default()
                .into_iter()
                .filter(|url| !url.trim().is_empty())
                .collect(),
        })
    }
}

impl TryFrom<ProductInput> for Product {
    type Error = ProductError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        input.validate()
    }
}

/// A validated product ready to be put in a cart or wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub labelled_price: Decimal,
    pub images: Vec<String>,
}

impl Product {
    /// First image URL, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
