//! Checkout: turn the current cart into an order draft.
//!
//! The draft is what the orders API receives. Posting it and clearing the
//! cart after a successful response is up to the caller (see
//! [`CommerceState::complete_checkout`](crate::CommerceState::complete_checkout)).

use tracing::instrument;

use storefront_state_core::{CheckoutError, Identity, OrderDraft};

use crate::cart::CartStore;
use crate::storage::KeyValueStore;

/// Contact details entered on the checkout page.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub phone: String,
    pub address: String,
}

/// Build an order draft from the cart of `identity`.
///
/// Only identities taken from a token count as logged in; guests are asked
/// to log in first.
///
/// # Errors
///
/// Returns a [`CheckoutError`] for a guest, blank contact details, or an
/// empty cart, checked in that order.
#[instrument(skip(cart, identity, contact), fields(identity = %identity.source()))]
pub fn prepare_order<S: KeyValueStore + ?Sized>(
    cart: &CartStore<'_, S>,
    identity: &Identity,
    contact: &ContactDetails,
) -> Result<OrderDraft, CheckoutError> {
    let lines = cart.get(identity);
    let draft = OrderDraft::build(
        !identity.is_guest(),
        &lines,
        &contact.phone,
        &contact.address,
    );
    match &draft {
        Ok(order) => tracing::info!(lines = order.products.len(), "Order draft prepared"),
        Err(e) => tracing::debug!(reason = %e, "Checkout rejected"),
    }
    draft
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use storefront_state_core::{GuestId, IdentitySource, ProductInput};

    use super::*;
    use crate::storage::MemoryStore;

    fn contact() -> ContactDetails {
        ContactDetails {
            phone: "0771234567".to_string(),
            address: "12 Temple Rd".to_string(),
        }
    }

    fn product() -> ProductInput {
        serde_json::from_value(json!({"productId": "P1", "price": 20, "labelledPrice": 25}))
            .unwrap()
    }

    #[test]
    fn test_guest_must_login() {
        let store = MemoryStore::new();
        let cart = CartStore::new(&store, "https://img.example/none.png");
        let guest = Identity::guest(GuestId::new("guest_c"));
        cart.add(&guest, product(), 1).unwrap();

        assert_eq!(
            prepare_order(&cart, &guest, &contact()).unwrap_err(),
            CheckoutError::NotLoggedIn
        );
    }

    #[test]
    fn test_logged_in_order() {
        let store = MemoryStore::new();
        let cart = CartStore::new(&store, "https://img.example/none.png");
        let user = Identity::from_claim(IdentitySource::Subject, "u1");
        cart.add(&user, product(), 2).unwrap();

        let draft = prepare_order(&cart, &user, &contact()).unwrap();
        assert_eq!(draft.products.len(), 1);
        assert_eq!(draft.products.first().unwrap().qty, 2);
        assert_eq!(draft.phone, "0771234567");
    }

    #[test]
    fn test_empty_cart() {
        let store = MemoryStore::new();
        let cart = CartStore::new(&store, "https://img.example/none.png");
        let user = Identity::from_claim(IdentitySource::Subject, "u1");
        assert_eq!(
            prepare_order(&cart, &user, &contact()).unwrap_err(),
            CheckoutError::EmptyCart
        );
    }
}
