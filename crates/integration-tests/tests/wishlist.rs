//! Wishlist behavior through the public store API.

#![allow(clippy::unwrap_used)]

use storefront_state::wishlist::WishlistAdd;
use storefront_state::{KeyValueStore, storage::keys};
use storefront_state_core::ProductId;
use storefront_state_integration_tests::{memory_state, product};

#[test]
fn test_add_is_idempotent_per_product() {
    let state = memory_state();
    let id = state.resolve_identity();

    let first = state.wishlist().add(&id, product("P1", 5, 6, &["x"])).unwrap();
    let second = state.wishlist().add(&id, product("P1", 5, 6, &["x"])).unwrap();

    assert_eq!(first, WishlistAdd::Added);
    assert_eq!(second, WishlistAdd::AlreadyPresent);
    assert_eq!(state.wishlist().get(&id).len(), 1);
}

#[test]
fn test_remove_returns_remaining_entries() {
    let state = memory_state();
    let id = state.resolve_identity();
    state.wishlist().add(&id, product("P1", 5, 6, &[])).unwrap();
    state.wishlist().add(&id, product("P2", 5, 6, &[])).unwrap();

    let remaining = state
        .wishlist()
        .remove(&id, &ProductId::new("P1"))
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.first().unwrap().product_id.as_str(), "P2");
    assert_eq!(remaining, state.wishlist().get(&id));

    let unchanged = state
        .wishlist()
        .remove(&id, &ProductId::new("P9"))
        .unwrap();
    assert_eq!(unchanged, remaining);
}

#[test]
fn test_membership_and_toggle() {
    let state = memory_state();
    let id = state.resolve_identity();
    let p1 = ProductId::new("P1");

    assert!(!state.wishlist().contains(&id, &p1));
    assert!(state.wishlist().toggle(&id, product("P1", 5, 6, &[])).unwrap());
    assert!(state.wishlist().contains(&id, &p1));
    assert!(!state.wishlist().toggle(&id, product("P1", 5, 6, &[])).unwrap());
    assert!(!state.wishlist().contains(&id, &p1));
}

#[test]
fn test_entries_keep_all_images() {
    let state = memory_state();
    let id = state.resolve_identity();
    state
        .wishlist()
        .add(&id, product("P1", 5, 6, &["a", "b"]))
        .unwrap();
    state.wishlist().add(&id, product("P2", 5, 6, &[])).unwrap();

    let entries = state.wishlist().get(&id);
    assert_eq!(entries.first().unwrap().images, vec!["a", "b"]);
    assert!(entries.get(1).unwrap().images.is_empty());
}

#[test]
fn test_corrupt_wishlist_reads_empty() {
    let state = memory_state();
    let id = state.resolve_identity();
    state
        .store()
        .set(&keys::wishlist(&id), "\"oops\"")
        .unwrap();

    assert!(state.wishlist().get(&id).is_empty());
}

#[test]
fn test_move_to_cart_uses_first_image_and_qty_one() {
    let state = memory_state();
    let id = state.resolve_identity();
    state
        .wishlist()
        .add(&id, product("P1", 20, 25, &["front", "back"]))
        .unwrap();

    assert!(state.move_to_cart(&id, &ProductId::new("P1")).unwrap());
    assert!(state.move_to_cart(&id, &ProductId::new("P1")).unwrap());

    let lines = state.cart().get(&id);
    let line = lines.first().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(line.qty, 2);
    assert_eq!(line.image, "front");
    assert!(state.wishlist().contains(&id, &ProductId::new("P1")));
}
