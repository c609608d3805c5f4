//! Inventory service collaborator.
//!
//! # Architecture
//!
//! - [`Inventory`] is the seam the cart talks through; the cart never knows
//!   whether stock comes from HTTP or from a test double
//! - [`HttpInventory`] reaches the inventory service over `reqwest`
//! - Product details may be cached via `moka`; stock never is, every cart
//!   operation validates against live stock
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` - full product record, or an empty payload when the
//!   product does not exist

mod http;

pub use http::HttpInventory;

use async_trait::async_trait;
use rocket_shoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the inventory service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Stock and product lookups by product ID.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Current purchasable stock for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError>;

    /// Full product details, or `None` if the service has no such product.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, InventoryError>;
}
