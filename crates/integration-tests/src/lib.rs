//! Integration tests for the storefront state store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-state-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Merge, removal, and total rules
//! - `wishlist` - Idempotent adds and move-to-cart
//! - `identity` - Token claims, guest persistence, isolation
//! - `file_store` - Persistence across reopen, corrupt files, quota
//! - `end_to_end` - Guest cart through login and checkout
//!
//! Helpers in this crate build stores, tokens, and product payloads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use secrecy::SecretString;
use serde_json::{Value, json};

use storefront_state::{CommerceState, FileStore, MemoryStore};
use storefront_state_core::ProductInput;

/// Placeholder image used by every test state.
pub const PLACEHOLDER: &str = "https://via.placeholder.com/150";

/// State over a fresh in-memory store.
#[must_use]
pub fn memory_state() -> CommerceState<MemoryStore> {
    CommerceState::new(MemoryStore::new(), PLACEHOLDER)
}

/// A state file path under the system temp dir that does not exist yet.
#[must_use]
pub fn temp_state_path() -> PathBuf {
    let suffix: u64 = rand::rng().random();
    std::env::temp_dir()
        .join(format!("storefront-state-it-{suffix:x}"))
        .join("state.json")
}

/// State over a file store at `path`.
#[must_use]
pub fn file_state(path: &Path) -> CommerceState<FileStore> {
    CommerceState::new(FileStore::new(path), PLACEHOLDER)
}

/// An unsigned three-segment token whose payload is `claims`.
#[must_use]
pub fn token(claims: &Value) -> SecretString {
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    SecretString::from(format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2lnbmF0dXJl"))
}

/// Product payload as the catalog API sends it.
///
/// # Panics
///
/// Panics if the payload does not deserialize, which only happens for
/// malformed test input.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: &str, price: i64, labelled_price: i64, images: &[&str]) -> ProductInput {
    serde_json::from_value(json!({
        "productId": id,
        "name": format!("Product {id}"),
        "price": price,
        "labelledPrice": labelled_price,
        "images": images,
    }))
    .expect("valid product payload")
}
