//! The cart state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocket_shoes_core::{LineItem, ProductId, Stock};
use tracing::{debug, info, instrument, warn};

use super::{CartSummary, Outcome, STORAGE_KEY, UpdateProductAmount};
use crate::error::{CartError, Operation, Result};
use crate::inventory::Inventory;
use crate::notify::Notifier;
use crate::store::CartStore;

/// Whether the loaded cart may be written back yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Seeding from the store; commits are not persisted.
    Initializing,
    /// Every commit is persisted.
    Ready,
}

#[derive(Debug)]
struct CartState {
    phase: Phase,
    items: Vec<LineItem>,
}

impl CartState {
    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
    }
}

/// Shopping cart bound to its inventory service, store and notifier.
///
/// All methods take `&self`; share one manager between tasks with an `Arc`.
/// The state lock is never held across an `.await`, and every operation
/// re-reads the cart after each inventory call before deciding what to commit.
///
/// Operations notify the shopper on failure and also return the error, so
/// callers that only care about the cart contents can ignore the result.
pub struct CartManager {
    inventory: Arc<dyn Inventory>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CartState>,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Create a cart seeded from whatever `store` holds under [`STORAGE_KEY`].
    ///
    /// A missing, unreadable or malformed stored value yields an empty cart.
    /// Loading never writes to the store.
    pub fn new(
        inventory: Arc<dyn Inventory>,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let manager = Self {
            inventory,
            store,
            notifier,
            state: Mutex::new(CartState {
                phase: Phase::Initializing,
                items: Vec::new(),
            }),
        };
        manager.initialize();
        manager
    }

    fn initialize(&self) {
        let items = load_items(self.store.as_ref());
        let mut state = self.lock();
        state.items = items;
        state.phase = Phase::Ready;
        debug!(items = state.items.len(), "Cart loaded");
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn cart(&self) -> Vec<LineItem> {
        self.lock().items.clone()
    }

    /// Totals for the current contents.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self.lock().items.as_slice())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// Increments the existing line, or appends a new line with details
    /// fetched from the inventory service.
    ///
    /// # Errors
    ///
    /// `OutOfStock` when the new quantity exceeds stock, `ProductNotFound`
    /// when the service has no details, `Inventory` when a lookup fails.
    /// The shopper has already been notified when an error is returned.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Outcome> {
        let result = self.try_add_product(product_id).await;
        self.report(Operation::Add, result)
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// `NotInCart` when no line matches. The shopper has already been
    /// notified when an error is returned.
    #[instrument(skip(self))]
    pub fn remove_product(&self, product_id: ProductId) -> Result<Outcome> {
        let result = self.try_remove_product(product_id);
        self.report(Operation::Remove, result)
    }

    /// Set a line's quantity to an absolute amount.
    ///
    /// Returns `Outcome::Unchanged` without notifying anyone when the product
    /// is not in the cart.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` when `amount < 1`, `OutOfStock` when it exceeds stock,
    /// `Inventory` when the stock lookup fails. The shopper has already been
    /// notified when an error is returned.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<Outcome> {
        let result = self.try_update_product_amount(request).await;
        self.report(Operation::UpdateAmount, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<Outcome> {
        let stock = self.inventory.stock(product_id).await?;

        {
            let mut state = self.lock();
            if let Some(item) = state.find_mut(product_id) {
                item.amount = next_amount(item, &stock)?;
                self.commit(&state);
                return Ok(Outcome::Committed);
            }
            ensure_in_stock(&stock, 1)?;
        }

        let mut product = self
            .inventory
            .product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        // Key the line by the id that was asked for.
        product.id = product_id;

        let mut state = self.lock();
        // Another add may have appended this product while we were fetching it.
        if let Some(item) = state.find_mut(product_id) {
            item.amount = next_amount(item, &stock)?;
        } else {
            state.items.push(LineItem::new(product, 1));
        }
        self.commit(&state);
        Ok(Outcome::Committed)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<Outcome> {
        let mut state = self.lock();
        let before = state.items.len();
        state.items.retain(|item| item.product_id() != product_id);

        if state.items.len() == before {
            return Err(CartError::NotInCart(product_id));
        }

        self.commit(&state);
        Ok(Outcome::Committed)
    }

    async fn try_update_product_amount(&self, request: UpdateProductAmount) -> Result<Outcome> {
        let UpdateProductAmount { product_id, amount } = request;

        if amount < 1 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let stock = self.inventory.stock(product_id).await?;

        let mut state = self.lock();
        let Some(item) = state.find_mut(product_id) else {
            debug!("Product not in cart, nothing to update");
            return Ok(Outcome::Unchanged);
        };

        ensure_in_stock(&stock, amount)?;
        item.amount =
            u32::try_from(amount).map_err(|_| CartError::InvalidAmount { product_id, amount })?;

        self.commit(&state);
        Ok(Outcome::Committed)
    }

    // =========================================================================
    // Commit & reporting
    // =========================================================================

    /// Persist the accepted state. Write failures are logged, never raised.
    fn commit(&self, state: &CartState) {
        if state.phase != Phase::Ready {
            return;
        }

        let serialized = match serde_json::to_string(&state.items) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        match self.store.set(STORAGE_KEY, &serialized) {
            Ok(()) => info!(items = state.items.len(), "Cart saved"),
            Err(e) => warn!(error = %e, "Failed to save cart"),
        }
    }

    /// Notify the shopper about a failed operation and pass the result through.
    fn report(&self, operation: Operation, result: Result<Outcome>) -> Result<Outcome> {
        if let Err(err) = &result {
            if err.is_validation() {
                debug!(?operation, error = %err, "Cart operation rejected");
            } else {
                warn!(?operation, error = %err, "Cart operation failed");
            }
            self.notifier.error(err.user_message(operation));
        }
        result
    }
}

fn ensure_in_stock(stock: &Stock, requested: i64) -> Result<()> {
    if stock.covers(requested) {
        Ok(())
    } else {
        Err(CartError::OutOfStock {
            product_id: stock.id,
            requested,
            available: stock.amount,
        })
    }
}

/// The item's amount plus one, if stock allows it.
fn next_amount(item: &LineItem, stock: &Stock) -> Result<u32> {
    let requested = i64::from(item.amount) + 1;
    ensure_in_stock(stock, requested)?;
    u32::try_from(requested).map_err(|_| CartError::InvalidAmount {
        product_id: item.product_id(),
        amount: requested,
    })
}

/// Read the stored cart, falling back to empty on any problem.
///
/// Lines with a zero amount or a repeated product id are dropped so a
/// hand-edited store cannot break the cart's invariants.
fn load_items(store: &dyn CartStore) -> Vec<LineItem> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    let items: Vec<LineItem> = match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Stored cart is malformed, starting empty");
            return Vec::new();
        }
    };

    let loaded = items.len();
    let mut kept: Vec<LineItem> = Vec::with_capacity(loaded);
    for item in items {
        if item.amount >= 1 && !kept.iter().any(|k| k.product_id() == item.product_id()) {
            kept.push(item);
        }
    }
    if kept.len() != loaded {
        warn!(
            dropped = loaded - kept.len(),
            "Dropped invalid lines from stored cart"
        );
    }
    kept
}
