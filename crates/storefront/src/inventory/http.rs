//! HTTP client for the inventory service.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use rocket_shoes_core::{Product, ProductId, Stock};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::{Inventory, InventoryError};
use crate::config::InventoryConfig;

const MAX_CACHED_PRODUCTS: u64 = 1000;

/// Inventory service client.
///
/// Cheap to clone. Product details are cached for the configured TTL;
/// stock lookups always hit the service.
#[derive(Clone)]
pub struct HttpInventory {
    inner: Arc<HttpInventoryInner>,
}

struct HttpInventoryInner {
    client: reqwest::Client,
    base_url: Url,
    products: Option<Cache<ProductId, Product>>,
}

impl HttpInventory {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns error if the API token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| InventoryError::Config(format!("Invalid API token format: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let products = (!config.product_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHED_PRODUCTS)
                .time_to_live(config.product_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(HttpInventoryInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                products,
            }),
        })
    }

    /// The service root requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// GET a path relative to the base URL and return the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value, InventoryError> {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Inventory service returned non-success status"
            );
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Inventory for HttpInventory {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError> {
        let value = self.get_json(&format!("stock/{id}")).await?;
        Ok(serde_json::from_value(value)?)
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Option<Product>, InventoryError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(Some(product));
        }

        let value = self.get_json(&format!("products/{id}")).await?;
        if is_empty_payload(&value) {
            return Ok(None);
        }

        let product: Product = serde_json::from_value(value)?;

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(Some(product))
    }
}

/// `null`, `false`, `{}` and `""` all mean "no such product".
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
