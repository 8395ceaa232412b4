//! Storefront State library.
//!
//! Keeps a cart and a wishlist per identity in durable key-value storage.
//! The identity comes from an unverified bearer token when one is stored,
//! otherwise from a persisted guest id.
//!
//! # Architecture
//!
//! - [`storage`] - key-value storage trait with in-memory and file backends
//! - [`identity`] - token claim decoding and identity resolution
//! - [`cart`] / [`wishlist`] - collection stores layered on storage
//! - [`checkout`] - order draft preparation from a cart
//! - [`state`] - [`CommerceState`], the facade handed to UI code
//!
//! # Concurrency
//!
//! Every operation is a synchronous read-modify-write of one serialized
//! collection. Two processes sharing a storage file can race, and the last
//! write wins for the whole collection.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod identity;
pub mod state;
pub mod storage;
pub mod wishlist;

pub use error::{Result, StoreError};
pub use state::CommerceState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
