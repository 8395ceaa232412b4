//! `wishlist` subcommands.

use serde::Serialize;
use serde_json::json;

use storefront_state_core::{Identity, ProductId, WishlistEntry};

use super::{CommandError, State, log_store_error, parse_product, print_json};

#[derive(Serialize)]
struct WishlistView {
    identity: Identity,
    entries: Vec<WishlistEntry>,
}

fn view(state: &State, identity: Identity) -> WishlistView {
    WishlistView {
        entries: state.wishlist().get(&identity),
        identity,
    }
}

pub fn show(state: &State) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    print_json(&view(state, identity))
}

pub fn add(state: &State, product: &str) -> Result<(), CommandError> {
    let input = parse_product(product)?;
    let identity = state.resolve_identity();
    let outcome = state
        .wishlist()
        .add(&identity, input)
        .map_err(log_store_error)?;
    if !outcome.is_added() {
        tracing::info!("Already in wishlist");
    }
    print_json(&view(state, identity))
}

pub fn remove(state: &State, product_id: String) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    state
        .wishlist()
        .remove(&identity, &ProductId::new(product_id))
        .map_err(log_store_error)?;
    print_json(&view(state, identity))
}

pub fn toggle(state: &State, product: &str) -> Result<(), CommandError> {
    let input = parse_product(product)?;
    let identity = state.resolve_identity();
    let saved = state
        .wishlist()
        .toggle(&identity, input)
        .map_err(log_store_error)?;
    print_json(&json!({ "saved": saved }))
}

pub fn contains(state: &State, product_id: String) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    let saved = state
        .wishlist()
        .contains(&identity, &ProductId::new(product_id));
    print_json(&json!({ "saved": saved }))
}

pub fn move_to_cart(state: &State, product_id: String) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    let moved = state
        .move_to_cart(&identity, &ProductId::new(product_id))
        .map_err(log_store_error)?;
    if !moved {
        tracing::warn!("Product not in wishlist");
    }
    print_json(&json!({ "moved": moved }))
}
