//! Shopping cart state.
//!
//! [`CartManager`] owns the ordered list of line items, validates every
//! quantity change against live stock, and writes the whole cart back to the
//! [`CartStore`](crate::store::CartStore) after each accepted change.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocket_shoes_storefront::cart::{CartManager, UpdateProductAmount};
//!
//! let cart = CartManager::new(inventory, store, notifier);
//! cart.add_product(ProductId::new(1)).await?;
//! cart.update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3)).await?;
//! cart.remove_product(ProductId::new(1))?;
//! ```

mod manager;
mod summary;

pub use manager::CartManager;
pub use summary::CartSummary;

use rocket_shoes_core::ProductId;
use serde::{Deserialize, Serialize};

/// Store key the cart is persisted under.
pub const STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a line item's quantity to an absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

/// What a successful operation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cart changed and was persisted.
    Committed,
    /// Nothing to do; cart and store untouched.
    Unchanged,
}
