//! Order draft built from a cart at checkout.
//!
//! The draft is the payload the orders API expects. Sending it is the
//! caller's job; this module only validates and shapes it.

use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::ProductId;

/// Reasons a checkout cannot produce an order.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// Orders require a logged-in customer.
    #[error("please login to place order")]
    NotLoggedIn,
    /// Phone number or address is blank.
    #[error("phone number and address are required")]
    MissingContactDetails,
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Order payload for the orders API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub products: Vec<OrderLine>,
    pub phone: String,
    pub address: String,
}

impl OrderDraft {
    /// Build a draft from cart lines and contact details.
    ///
    /// Checks run in this order: login, contact details, non-empty cart.
    /// Lines with a zero quantity are left out.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] that applies.
    pub fn build(
        logged_in: bool,
        lines: &[CartLine],
        phone: &str,
        address: &str,
    ) -> Result<Self, CheckoutError> {
        if !logged_in {
            return Err(CheckoutError::NotLoggedIn);
        }

        let phone = phone.trim();
        let address = address.trim();
        if phone.is_empty() || address.is_empty() {
            return Err(CheckoutError::MissingContactDetails);
        }

        let products: Vec<OrderLine> = lines
            .iter()
            .filter(|line| line.qty > 0)
            .map(|line| OrderLine {
                product_id: line.product_id.clone(),
                qty: line.qty,
            })
            .collect();
        if products.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            products,
            phone: phone.to_owned(),
            address: address.to_owned(),
        })
    }
}
