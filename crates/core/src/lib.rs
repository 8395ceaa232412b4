//! Storefront State Core - Shared types library.
//!
//! This crate provides the types used across the storefront state components:
//! - `storefront-state` - Identity-scoped cart and wishlist store
//! - `storefront-state-cli` - Command-line front end for the store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no token
//! decoding. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, product input validation, cart lines, wishlist
//!   entries, identities, and order drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
