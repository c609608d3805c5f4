//! Integration tests for the Rocket Shoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-shoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_http` - `CartManager` against a fake HTTP inventory service and a
//!   file-backed store
//! - `cart_scenarios` - end-to-end shopper scenarios on in-memory collaborators
//!
//! The fake inventory service in this crate mimics the JSON API the cart
//! talks to: `GET /stock/{id}` and `GET /products/{id}`, answering `{}` for
//! unknown products.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

#[derive(Default)]
struct FakeState {
    stock: Mutex<HashMap<i32, i64>>,
    products: Mutex<HashMap<i32, Value>>,
    stock_status: Mutex<Option<StatusCode>>,
    stock_hits: AtomicUsize,
    product_hits: AtomicUsize,
    authorization: Mutex<Option<String>>,
}

/// A running fake inventory service.
///
/// The server task lives until the test's runtime shuts down.
#[derive(Clone)]
pub struct FakeInventoryService {
    state: Arc<FakeState>,
    addr: SocketAddr,
}

impl FakeInventoryService {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state, addr }
    }

    /// Root URL of the service.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// Register a product record (served verbatim) and its stock.
    pub fn add_product(&self, product: Value, stock: i64) {
        let id = i32::try_from(product["id"].as_i64().unwrap()).unwrap();
        self.state.products.lock().unwrap().insert(id, product);
        self.state.stock.lock().unwrap().insert(id, stock);
    }

    /// Change the stock reported for `id`.
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.state.stock.lock().unwrap().insert(id, amount);
    }

    /// Force every stock request to answer with `status`.
    pub fn fail_stock_with(&self, status: StatusCode) {
        *self.state.stock_status.lock().unwrap() = Some(status);
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.state.authorization.lock().unwrap().clone()
    }
}

fn record_auth(state: &FakeState, headers: &HeaderMap) {
    *state.authorization.lock().unwrap() = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
}

async fn stock(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);

    if let Some(status) = *state.stock_status.lock().unwrap() {
        return (status, "stock unavailable").into_response();
    }

    let amount = state.stock.lock().unwrap().get(&id).copied();
    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Json<Value> {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);

    let product = state.products.lock().unwrap().get(&id).cloned();
    Json(product.unwrap_or_else(|| json!({})))
}

/// A product record as the inventory service serves it.
#[must_use]
pub fn product_json(id: i32, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "image": format!("https://cdn.example.com/sneakers/{id}.jpg"),
    })
}
