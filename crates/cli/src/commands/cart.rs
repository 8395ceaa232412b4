//! `cart` subcommands.

use serde::Serialize;

use storefront_state_core::{CartLine, Identity, LineChange, ProductId};

use super::{CommandError, State, log_store_error, parse_product, print_json};

/// Cart as printed by `cart show` and after every cart mutation.
#[derive(Serialize)]
struct CartView {
    identity: Identity,
    lines: Vec<CartLine>,
    item_count: u64,
    total: String,
}

fn view(state: &State, identity: Identity) -> CartView {
    let cart = state.cart();
    let lines = cart.get(&identity);
    CartView {
        item_count: storefront_state_core::cart::item_count(&lines),
        total: format!("{:.2}", storefront_state_core::cart::total(&lines)),
        lines,
        identity,
    }
}

pub fn show(state: &State) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    print_json(&view(state, identity))
}

pub fn add(state: &State, product: &str, qty: i64) -> Result<(), CommandError> {
    let input = parse_product(product)?;
    let identity = state.resolve_identity();
    let change = state
        .cart()
        .add(&identity, input, qty)
        .map_err(log_store_error)?;
    if change == LineChange::Unchanged {
        tracing::info!("Cart unchanged");
    }
    print_json(&view(state, identity))
}

pub fn remove(state: &State, product_id: String) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    let removed = state
        .cart()
        .remove(&identity, &ProductId::new(product_id))
        .map_err(log_store_error)?;
    if !removed {
        tracing::info!("Product not in cart");
    }
    print_json(&view(state, identity))
}

pub fn clear(state: &State) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    state.cart().clear(&identity).map_err(log_store_error)?;
    print_json(&view(state, identity))
}

pub fn total(state: &State) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    let total = state.cart().total(&identity);
    print_json(&serde_json::json!({ "total": format!("{total:.2}") }))
}
