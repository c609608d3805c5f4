//! Cart line items.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// One product entry in the cart with its quantity.
///
/// Serialized flat: the product's fields followed by `amount`, which is the
/// format the cart store has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl LineItem {
    /// Create a line item. Callers keep `amount >= 1`.
    #[must_use]
    pub const fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount)
    }
}
