//! Storefront State CLI - Inspect and edit the local cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Show who the store thinks you are
//! sfs whoami
//!
//! # Log in with a bearer token issued by the users API
//! sfs login eyJhbGciOi...
//!
//! # Add two of a product to the cart, then take one away
//! sfs cart add --product '{"productId":"P1","price":20,"labelledPrice":25,"images":["x"]}' --qty 2
//! sfs cart add --product '{"productId":"P1","price":20,"labelledPrice":25}' --qty -1
//!
//! # Wishlist
//! sfs wishlist toggle --product '{"productId":"P2","price":5,"labelledPrice":5}'
//! sfs wishlist move-to-cart P2
//!
//! # Prepare an order
//! sfs checkout --phone 0771234567 --address "12 Temple Rd"
//! ```
//!
//! # Commands
//!
//! - `whoami` - Resolved identity
//! - `login` / `logout` - Store or forget the bearer token
//! - `cart` - Show, add, remove, clear, total
//! - `wishlist` - Show, add, remove, toggle, contains, move-to-cart
//! - `checkout` - Build the order payload, optionally clearing the cart
//!
//! Results are printed to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_state::config::StateConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sfs")]
#[command(author, version, about = "Storefront cart and wishlist tools")]
struct Cli {
    /// Backing state file (overrides `STOREFRONT_STATE_PATH`)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved identity
    Whoami,
    /// Store a bearer token
    Login {
        /// Token as returned by the login endpoint
        token: String,
    },
    /// Forget the bearer token
    Logout,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Build the order payload from the cart
    Checkout {
        /// Contact phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Delivery address
        #[arg(long, default_value = "")]
        address: String,

        /// Clear the cart once the order payload is built
        #[arg(long)]
        complete: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines, item count, and total
    Show,
    /// Change a product's quantity (negative to decrease)
    Add {
        /// Product as JSON
        #[arg(short, long)]
        product: String,

        /// Quantity delta
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        product_id: String,
    },
    /// Empty the cart
    Clear,
    /// Show the cart total
    Total,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlist entries
    Show,
    /// Add a product
    Add {
        /// Product as JSON
        #[arg(short, long)]
        product: String,
    },
    /// Remove a product
    Remove {
        /// Product id
        product_id: String,
    },
    /// Add if absent, remove if present
    Toggle {
        /// Product as JSON
        #[arg(short, long)]
        product: String,
    },
    /// Check whether a product is saved
    Contains {
        /// Product id
        product_id: String,
    },
    /// Put a saved product in the cart with quantity one
    MoveToCart {
        /// Product id
        product_id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StateConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to warnings only so stdout stays clean JSON for scripts
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_state=warn,storefront_state_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StateConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            drop(sentry_guard);
            std::process::exit(1);
        }
    };
    if let Some(path) = cli.state {
        config.state_path = path;
    }

    if let Err(e) = commands::run(cli.command, &config) {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}
