//! Rocket Shoes Storefront - shopping cart state manager.
//!
//! # Architecture
//!
//! - [`cart::CartManager`] holds the ordered line items and enforces stock
//!   limits on every change
//! - [`inventory`] reaches the stock and product service
//! - [`store`] persists the cart as one string under a fixed key
//! - [`notify`] shows error messages to the shopper
//!
//! The three collaborators are traits injected into the manager, so the same
//! cart logic runs against HTTP and a file in the CLI, and against in-memory
//! doubles (see the `testkit` feature) in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod inventory;
pub mod notify;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use cart::{CartManager, CartSummary, Outcome, STORAGE_KEY, UpdateProductAmount};
pub use error::{CartError, Operation};
