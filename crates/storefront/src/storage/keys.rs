//! Well-known storage keys.

use storefront_state_core::Identity;

/// Key holding the bearer token written by the login flow.
pub const TOKEN: &str = "token";

/// Key holding the generated guest identifier.
pub const GUEST_ID: &str = "guest_id";

/// Prefix of per-identity cart keys.
pub const CART_PREFIX: &str = "cart_";

/// Prefix of per-identity wishlist keys.
pub const WISHLIST_PREFIX: &str = "wishlist_";

/// Storage key of the cart for `identity`.
#[must_use]
pub fn cart(identity: &Identity) -> String {
    format!("{CART_PREFIX}{}", identity.key())
}

/// Storage key of the wishlist for `identity`.
#[must_use]
pub fn wishlist(identity: &Identity) -> String {
    format!("{WISHLIST_PREFIX}{}", identity.key())
}
