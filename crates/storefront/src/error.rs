//! Cart error handling.
//!
//! Every cart operation failure is a `CartError`. The shopper only ever sees
//! one fixed message per operation (plus a dedicated out-of-stock message),
//! but the variants keep business-rule rejections apart from collaborator
//! failures so callers and tests can tell them apart.

use rocket_shoes_core::ProductId;
use thiserror::Error;

use crate::inventory::InventoryError;

/// Shown when a requested quantity exceeds available stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity out of stock";

/// The cart operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// Generic user-facing message for a failed operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::Remove => "Error removing product",
            Self::UpdateAmount => "Error changing product quantity",
        }
    }
}

/// Reasons a cart operation did not commit.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds current stock.
    #[error("Out of stock: product {product_id} requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Requested quantity is below one.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Inventory service failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Inventory service has no such product.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),
}

impl CartError {
    /// Business-rule rejection rather than a collaborator failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::OutOfStock { .. } | Self::InvalidAmount { .. } | Self::NotInCart(_)
        )
    }

    /// Message shown to the shopper when `operation` fails with this error.
    #[must_use]
    pub const fn user_message(&self, operation: Operation) -> &'static str {
        match self {
            Self::OutOfStock { .. } => OUT_OF_STOCK_MESSAGE,
            _ => operation.failure_message(),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
