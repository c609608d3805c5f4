//! Product and stock records as reported by the inventory service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Price, ProductId};

/// Full product record from `GET /products/{id}`.
///
/// Only `id` is required. Missing display fields default to empty, a missing
/// price to zero. Fields the cart does not know about are kept in `extra` so
/// they survive a store/reload cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra fields.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// Stock record from `GET /stock/{id}`.
///
/// `amount` is the maximum purchasable quantity. It is signed because the
/// service is free to report zero or negative stock for oversold products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}

impl Stock {
    /// Create a stock record.
    #[must_use]
    pub const fn new(id: ProductId, amount: i64) -> Self {
        Self { id, amount }
    }

    /// Whether `requested` units can be sold.
    #[must_use]
    pub const fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let json = r#"{"id":3,"name":"Tênis Adidas Duramo Lite 2.0","price":219.9,"image":"a.jpg","brand":"adidas"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.name, "Tênis Adidas Duramo Lite 2.0");
        assert_eq!(product.price, Price::from_cents(21_990));
        assert_eq!(product.extra.get("brand"), Some(&Value::from("adidas")));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["brand"], "adidas");
    }

    #[test]
    fn test_product_image_defaults_to_empty() {
        let product: Product = serde_json::from_str(r#"{"id":1,"name":"x","price":1}"#).unwrap();
        assert!(product.image.is_empty());
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_product_needs_only_an_id() {
        let product: Product = serde_json::from_str(r#"{"id":5}"#).unwrap();

        assert_eq!(product.id, ProductId::new(5));
        assert!(product.name.is_empty());
        assert_eq!(product.price, Price::ZERO);
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_product_other_naming_schemes_survive_as_extra() {
        let json = r#"{"id":2,"title":"Trail Runner","price":99.9}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.name.is_empty());
        assert_eq!(product.extra.get("title"), Some(&Value::from("Trail Runner")));
        assert_eq!(serde_json::to_value(&product).unwrap()["title"], "Trail Runner");
    }

    #[test]
    fn test_product_without_id_is_rejected() {
        assert!(serde_json::from_str::<Product>(r#"{"name":"x","price":1}"#).is_err());
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock::new(ProductId::new(1), 3);
        assert!(stock.covers(3));
        assert!(!stock.covers(4));
        assert!(!Stock::new(ProductId::new(1), 0).covers(1));
    }
}
