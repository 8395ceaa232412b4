//! Command implementations.
//!
//! Each command opens the file-backed store, resolves the identity, and
//! prints its result as JSON.

use serde::Serialize;
use thiserror::Error;

use storefront_state::config::StateConfig;
use storefront_state::{CommerceState, FileStore, StorageError, StoreError};
use storefront_state_core::{CheckoutError, ProductInput};

use crate::{CartAction, Commands, WishlistAction};

mod cart;
mod checkout;
mod session;
mod wishlist;

/// Errors surfaced to the user by a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A cart or wishlist update failed.
    #[error("{}", .0.user_message())]
    Store(#[from] StoreError),

    /// Token storage failed.
    #[error("Failed to update session: {0}")]
    Session(#[from] StorageError),

    /// The order could not be prepared.
    #[error("Checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    /// `--product` is not valid JSON.
    #[error("Invalid product JSON: {0}")]
    ProductJson(#[source] serde_json::Error),

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Output(#[source] serde_json::Error),
}

/// Run a command against the store described by `config`.
///
/// # Errors
///
/// Returns a [`CommandError`] describing the failed operation.
pub fn run(command: Commands, config: &StateConfig) -> Result<(), CommandError> {
    let state = CommerceState::open(config);
    tracing::debug!(path = %config.state_path.display(), "Opened state file");

    match command {
        Commands::Whoami => session::whoami(&state),
        Commands::Login { token } => session::login(&state, token),
        Commands::Logout => session::logout(&state),
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show(&state),
            CartAction::Add { product, qty } => cart::add(&state, &product, qty),
            CartAction::Remove { product_id } => cart::remove(&state, product_id),
            CartAction::Clear => cart::clear(&state),
            CartAction::Total => cart::total(&state),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => wishlist::show(&state),
            WishlistAction::Add { product } => wishlist::add(&state, &product),
            WishlistAction::Remove { product_id } => wishlist::remove(&state, product_id),
            WishlistAction::Toggle { product } => wishlist::toggle(&state, &product),
            WishlistAction::Contains { product_id } => wishlist::contains(&state, product_id),
            WishlistAction::MoveToCart { product_id } => {
                wishlist::move_to_cart(&state, product_id)
            }
        },
        Commands::Checkout {
            phone,
            address,
            complete,
        } => checkout::run(&state, phone, address, complete),
    }
}

type State = CommerceState<FileStore>;

/// Parse a `--product` argument.
fn parse_product(json: &str) -> Result<ProductInput, CommandError> {
    serde_json::from_str(json).map_err(CommandError::ProductJson)
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)] // stdout is the command's output channel
fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let encoded = serde_json::to_string_pretty(value).map_err(CommandError::Output)?;
    println!("{encoded}");
    Ok(())
}

/// Log the underlying error of a failed store update before surfacing it.
fn log_store_error(e: StoreError) -> CommandError {
    tracing::warn!(error = %e, "Store update failed");
    CommandError::Store(e)
}
