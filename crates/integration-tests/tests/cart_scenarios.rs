//! Shopper scenarios on in-memory collaborators.
//!
//! These exercise the public `CartManager` API the way a storefront UI would,
//! using the `testkit` doubles from the storefront crate.

use std::sync::Arc;

use rocket_shoes_core::{LineItem, ProductId};
use rocket_shoes_storefront::testkit::{
    MemoryInventory, RecordingNotifier, RecordingStore, product,
};
use rocket_shoes_storefront::{CartManager, Outcome, STORAGE_KEY, UpdateProductAmount};

struct Shop {
    inventory: Arc<MemoryInventory>,
    store: Arc<RecordingStore>,
    notifier: Arc<RecordingNotifier>,
    cart: CartManager,
}

impl Shop {
    fn open(inventory: MemoryInventory, store: RecordingStore) -> Self {
        let inventory = Arc::new(inventory);
        let store = Arc::new(store);
        let notifier = Arc::new(RecordingNotifier::new());
        let cart = CartManager::new(inventory.clone(), store.clone(), notifier.clone());
        Self {
            inventory,
            store,
            notifier,
            cart,
        }
    }

    fn lines(&self) -> Vec<(i32, u32)> {
        self.cart
            .cart()
            .iter()
            .map(|item| (item.product_id().as_i32(), item.amount))
            .collect()
    }
}

fn stored(lines: &[(i32, u32)]) -> RecordingStore {
    let items: Vec<LineItem> = lines
        .iter()
        .map(|&(id, amount)| LineItem::new(product(id), amount))
        .collect();
    RecordingStore::with_value(STORAGE_KEY, serde_json::to_string(&items).unwrap())
}

fn id(raw: i32) -> ProductId {
    ProductId::new(raw)
}

#[tokio::test]
async fn test_first_add_to_empty_cart() {
    let shop = Shop::open(
        MemoryInventory::new().with_product(product(1), 5),
        RecordingStore::new(),
    );

    shop.cart.add_product(id(1)).await.unwrap();

    assert_eq!(shop.lines(), vec![(1, 1)]);
    assert_eq!(shop.store.writes().len(), 1);
}

#[tokio::test]
async fn test_add_beyond_single_unit_stock() {
    let shop = Shop::open(
        MemoryInventory::new().with_product(product(1), 1),
        stored(&[(1, 1)]),
    );

    assert!(shop.cart.add_product(id(1)).await.is_err());

    assert_eq!(shop.lines(), vec![(1, 1)]);
    assert!(shop.store.writes().is_empty());
    assert_eq!(
        shop.notifier.messages(),
        vec!["Requested quantity out of stock".to_string()]
    );
}

#[tokio::test]
async fn test_update_to_zero_rejected() {
    let shop = Shop::open(
        MemoryInventory::new().with_product(product(1), 5),
        stored(&[(1, 3)]),
    );

    assert!(
        shop.cart
            .update_product_amount(UpdateProductAmount::new(id(1), 0))
            .await
            .is_err()
    );

    assert_eq!(shop.lines(), vec![(1, 3)]);
    assert!(shop.store.writes().is_empty());
}

#[test]
fn test_remove_second_line() {
    let shop = Shop::open(MemoryInventory::new(), stored(&[(1, 2), (2, 1)]));

    shop.cart.remove_product(id(2)).unwrap();

    assert_eq!(shop.lines(), vec![(1, 2)]);
}

#[tokio::test]
async fn test_update_beyond_stock_rejected() {
    let shop = Shop::open(
        MemoryInventory::new().with_product(product(5), 3),
        stored(&[(5, 1)]),
    );

    assert!(
        shop.cart
            .update_product_amount(UpdateProductAmount::new(id(5), 10))
            .await
            .is_err()
    );

    assert_eq!(shop.lines(), vec![(5, 1)]);
    assert_eq!(
        shop.notifier.last().as_deref(),
        Some("Requested quantity out of stock")
    );
}

#[tokio::test]
async fn test_rejections_never_touch_cart_or_store() {
    let inventory = MemoryInventory::new()
        .with_product(product(1), 2)
        .with_stock_only(id(3), 9);
    let shop = Shop::open(inventory, stored(&[(1, 2), (2, 1)]));
    let before = shop.cart.cart();

    let _ = shop.cart.add_product(id(1)).await;
    let _ = shop.cart.add_product(id(3)).await;
    let _ = shop.cart.remove_product(id(4));
    let _ = shop
        .cart
        .update_product_amount(UpdateProductAmount::new(id(1), 0))
        .await;
    let _ = shop
        .cart
        .update_product_amount(UpdateProductAmount::new(id(1), 3))
        .await;

    shop.inventory.fail_stock(true);
    let _ = shop.cart.add_product(id(2)).await;

    assert_eq!(shop.cart.cart(), before);
    assert!(shop.store.writes().is_empty());
    assert_eq!(shop.notifier.messages().len(), 6);
}

#[tokio::test]
async fn test_browsing_session() {
    let inventory = MemoryInventory::new()
        .with_product(product(1), 3)
        .with_product(product(2), 5)
        .with_product(product(3), 2);
    let shop = Shop::open(inventory, RecordingStore::new());

    for raw in [3, 1, 2, 1] {
        shop.cart.add_product(id(raw)).await.unwrap();
    }
    assert_eq!(shop.lines(), vec![(3, 1), (1, 2), (2, 1)]);

    let outcome = shop
        .cart
        .update_product_amount(UpdateProductAmount::new(id(2), 5))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Committed);

    shop.cart.remove_product(id(1)).unwrap();
    assert_eq!(shop.lines(), vec![(3, 1), (2, 5)]);

    // Updating something no longer in the cart is a quiet no-op.
    let outcome = shop
        .cart
        .update_product_amount(UpdateProductAmount::new(id(1), 1))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Unchanged);

    let (_, last) = shop.store.writes().pop().unwrap();
    let reopened = Shop::open(
        MemoryInventory::new(),
        RecordingStore::with_value(STORAGE_KEY, last),
    );
    assert_eq!(reopened.cart.cart(), shop.cart.cart());
    assert_eq!(reopened.cart.summary().total_quantity, 6);
    assert!(shop.notifier.messages().is_empty());
}
