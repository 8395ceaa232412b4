//! `checkout`.

use storefront_state::checkout::ContactDetails;

use super::{CommandError, State, log_store_error, print_json};

pub fn run(
    state: &State,
    phone: String,
    address: String,
    complete: bool,
) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    let draft = state.checkout(&identity, &ContactDetails { phone, address })?;
    print_json(&draft)?;

    if complete {
        state
            .complete_checkout(&identity)
            .map_err(log_store_error)?;
        tracing::info!("Cart cleared after checkout");
    }
    Ok(())
}
