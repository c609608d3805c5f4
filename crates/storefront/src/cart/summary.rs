//! Totals derived from the cart contents.

use rocket_shoes_core::{LineItem, Price};
use serde::Serialize;

/// Header badge and cart page totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Number of distinct products.
    pub distinct_items: usize,
    /// Sum of all line amounts.
    pub total_quantity: u64,
    /// Sum of price times amount over all lines.
    pub subtotal: Price,
}

impl CartSummary {
    /// An empty cart's totals.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            distinct_items: 0,
            total_quantity: 0,
            subtotal: Price::ZERO,
        }
    }
}

impl From<&[LineItem]> for CartSummary {
    fn from(items: &[LineItem]) -> Self {
        Self {
            distinct_items: items.len(),
            total_quantity: items.iter().map(|item| u64::from(item.amount)).sum(),
            subtotal: items.iter().map(LineItem::line_total).sum(),
        }
    }
}
