//! Rocket Shoes Core - Shared types library.
//!
//! This crate provides the types shared by the Rocket Shoes components:
//! - `storefront` - Cart state manager and its collaborator adapters
//! - `cli` - Command-line driver for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, product and stock records, cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
