//! `whoami`, `login`, `logout`.

use secrecy::SecretString;
use serde::Serialize;

use storefront_state_core::Identity;

use super::{CommandError, State, print_json};

#[derive(Serialize)]
struct Whoami {
    identity: Identity,
    logged_in: bool,
}

pub fn whoami(state: &State) -> Result<(), CommandError> {
    let identity = state.resolve_identity();
    print_json(&Whoami {
        logged_in: !identity.is_guest(),
        identity,
    })
}

pub fn login(state: &State, token: String) -> Result<(), CommandError> {
    state.login(&SecretString::from(token))?;
    let identity = state.resolve_identity();
    if identity.is_guest() {
        tracing::warn!("Token stored but carries no usable identity claim");
    }
    whoami(state)
}

pub fn logout(state: &State) -> Result<(), CommandError> {
    state.logout()?;
    whoami(state)
}
