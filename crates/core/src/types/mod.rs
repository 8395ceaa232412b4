//! Core types for the storefront state store.
//!
//! This module provides type-safe wrappers for the cart and wishlist domain.

pub mod amount;
pub mod cart;
pub mod id;
pub mod identity;
pub mod order;
pub mod product;
pub mod wishlist;

pub use cart::{CartLine, LineChange, QuantityError};
pub use id::*;
pub use identity::{Identity, IdentitySource};
pub use order::{CheckoutError, OrderDraft, OrderLine};
pub use product::{Product, ProductError, ProductInput};
pub use wishlist::WishlistEntry;
