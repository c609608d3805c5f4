//! In-memory collaborators for exercising a [`CartManager`](crate::cart::CartManager)
//! without a network or a disk.
//!
//! Enabled with the `testkit` feature (always available to this crate's own tests).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rocket_shoes_core::{Price, Product, ProductId, Stock};

use crate::inventory::{Inventory, InventoryError};
use crate::notify::Notifier;
use crate::store::{CartStore, MemoryStore, StoreError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A product fixture with a predictable name, price and image.
#[must_use]
pub fn product(id: i32) -> Product {
    Product::new(
        ProductId::new(id),
        format!("Sneaker {id}"),
        Price::from_cents(i64::from(id) * 1_000 + 990),
        format!("https://cdn.example.com/sneakers/{id}.jpg"),
    )
}

// =============================================================================
// MemoryInventory
// =============================================================================

/// Scriptable inventory service.
///
/// Every lookup yields to the scheduler once before answering, so concurrent
/// cart operations on a single-threaded runtime interleave at the same points
/// they would against a real service.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
    stock_failing: AtomicBool,
    products_failing: AtomicBool,
    stock_calls: AtomicUsize,
    product_calls: AtomicUsize,
}

impl MemoryInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with the given stock.
    #[must_use]
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        let id = product.id;
        lock(&self.products).insert(id, product);
        lock(&self.stock).insert(id, stock);
        self
    }

    /// Register only a stock record; product lookups for `id` return `None`.
    #[must_use]
    pub fn with_stock_only(self, id: ProductId, stock: i64) -> Self {
        lock(&self.stock).insert(id, stock);
        self
    }

    /// Change the stock reported for `id`.
    pub fn set_stock(&self, id: ProductId, amount: i64) {
        lock(&self.stock).insert(id, amount);
    }

    /// Make every stock lookup fail.
    pub fn fail_stock(&self, failing: bool) {
        self.stock_failing.store(failing, Ordering::SeqCst);
    }

    /// Make every product lookup fail.
    pub fn fail_products(&self, failing: bool) {
        self.products_failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Number of product lookups served so far.
    #[must_use]
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }
}

fn unavailable() -> InventoryError {
    InventoryError::Api {
        status: 503,
        message: "inventory unavailable".to_string(),
    }
}

#[async_trait]
impl Inventory for MemoryInventory {
    async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError> {
        tokio::task::yield_now().await;
        self.stock_calls.fetch_add(1, Ordering::SeqCst);

        if self.stock_failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        lock(&self.stock)
            .get(&id)
            .map(|amount| Stock::new(id, *amount))
            .ok_or_else(|| InventoryError::Api {
                status: 404,
                message: format!("no stock record for {id}"),
            })
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, InventoryError> {
        tokio::task::yield_now().await;
        self.product_calls.fetch_add(1, Ordering::SeqCst);

        if self.products_failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        Ok(lock(&self.products).get(&id).cloned())
    }
}

// =============================================================================
// RecordingNotifier
// =============================================================================

/// Notifier that remembers every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in delivery order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    /// The most recent message.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        lock(&self.messages).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }
}

// =============================================================================
// RecordingStore
// =============================================================================

/// In-memory store that also records every write.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `value` under `key`. Seeding is not recorded.
    #[must_use]
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        Self {
            inner: MemoryStore::with_value(key, value),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every `(key, value)` written, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        lock(&self.writes).clone()
    }
}

impl CartStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.writes).push((key.to_string(), value.to_string()));
        self.inner.set(key, value)
    }
}

/// Store whose every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrokenStore;

impl CartStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(std::io::Error::other("store offline").into())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(std::io::Error::other("store offline").into())
    }
}
