//! Guest cart from first visit through login and checkout.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;

use storefront_state::checkout::ContactDetails;
use storefront_state::{CommerceState, KeyValueStore};
use storefront_state_core::CheckoutError;
use storefront_state_integration_tests::{
    file_state, memory_state, product, temp_state_path, token,
};

fn guest_first_add<S: KeyValueStore>(state: &CommerceState<S>) {
    let guest = state.resolve_identity();
    assert!(guest.is_guest());

    state
        .cart()
        .add(&guest, product("P1", 20, 25, &["x"]), 1)
        .unwrap();

    let lines = state.cart().get(&guest);
    assert_eq!(lines.len(), 1);
    let line = lines.first().unwrap();
    assert_eq!(line.product_id.as_str(), "P1");
    assert_eq!(line.qty, 1);
    assert_eq!(line.price, Decimal::from(20));
    assert_eq!(line.labelled_price, Decimal::from(25));
    assert_eq!(line.image, "x");
    assert_eq!(state.cart().total(&guest), Decimal::from(20));
}

#[test]
fn test_guest_first_add_in_memory() {
    guest_first_add(&memory_state());
}

#[test]
fn test_guest_first_add_on_disk() {
    let path = temp_state_path();
    guest_first_add(&file_state(&path));
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn test_checkout_flow() {
    let state = memory_state();
    let guest = state.resolve_identity();
    state.cart().add(&guest, product("P1", 20, 25, &[]), 1).unwrap();

    let contact = ContactDetails {
        phone: " 0771234567 ".to_string(),
        address: "12 Temple Rd".to_string(),
    };
    assert_eq!(
        state.checkout(&guest, &contact).unwrap_err(),
        CheckoutError::NotLoggedIn
    );

    state.login(&token(&json!({"sub": "u1"}))).unwrap();
    let user = state.resolve_identity();
    assert_eq!(
        state.checkout(&user, &contact).unwrap_err(),
        CheckoutError::EmptyCart
    );

    state.cart().add(&user, product("P1", 20, 25, &[]), 2).unwrap();
    state.cart().add(&user, product("P2", 5, 5, &[]), 1).unwrap();
    let draft = state.checkout(&user, &contact).unwrap();

    assert_eq!(
        serde_json::to_value(&draft).unwrap(),
        json!({
            "products": [
                {"productId": "P1", "qty": 2},
                {"productId": "P2", "qty": 1},
            ],
            "phone": "0771234567",
            "address": "12 Temple Rd",
        })
    );

    state.complete_checkout(&user).unwrap();
    assert!(state.cart().get(&user).is_empty());
    assert_eq!(state.cart().get(&guest).len(), 1);
}
