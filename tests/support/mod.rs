#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::Notify;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use storefront_views::{config::AppConfig, state::AppState};

#[derive(Debug, Clone)]
pub struct StubLine {
    pub id: String,
    pub quantity: u32,
    pub price: f64,
    pub name: String,
}

impl StubLine {
    pub fn new(id: &str, quantity: u32, price: f64) -> Self {
        Self {
            id: id.to_string(),
            quantity,
            price,
            name: format!("Product {id}"),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "quantity": self.quantity,
            "userId": "user-1",
            "productId": {
                "_id": format!("product-{}", self.id),
                "productName": self.name,
                "category": "mobiles",
                "sellingPrice": self.price,
                "productImage": [format!("https://img.example/{}.png", self.id)],
            }
        })
    }
}

/// In-memory storefront backend. Every handled request is appended to `requests`.
#[derive(Debug, Default)]
pub struct Backend {
    pub lines: Vec<StubLine>,
    pub requests: Vec<String>,
    pub request_ids: Vec<String>,
    pub malformed_cart: bool,
    pub reject_cart: bool,
    pub cart_gate: Option<Arc<Notify>>,
    pub reject_updates: bool,
    pub fail_checkout: bool,
    pub orders_unauthorized: bool,
    pub checkout_id: Option<String>,
    pub checkout_bodies: Vec<Value>,
    pub orders: Option<Value>,
    pub fail_verify: bool,
    pub verified_sessions: Vec<String>,
}

impl Backend {
    pub fn with_lines(lines: Vec<StubLine>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests.iter().filter(|r| r.as_str() == request).count()
    }

    fn record(&mut self, request: &str, headers: &HeaderMap) {
        self.requests.push(request.to_string());
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.push(id.to_string());
        }
    }
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct Stub {
    pub base_url: String,
    pub backend: Shared,
}

impl Stub {
    pub fn config(&self) -> AppConfig {
        AppConfig::for_api(&self.base_url).with_stripe_public_key("pk_test_123")
    }

    pub fn state(&self) -> anyhow::Result<AppState> {
        Ok(AppState::new(self.config())?)
    }

    pub fn backend(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }
}

pub async fn spawn(backend: Backend) -> anyhow::Result<Stub> {
    let backend: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/api/view-card-product", get(read_cart))
        .route("/api/update-cart-product", post(update_line))
        .route("/api/delete-cart-product", post(delete_line))
        .route("/api/countAddToCartProduct", get(cart_count))
        .route("/api/checkout", post(checkout))
        .route("/api/order-list", get(order_list))
        .route("/api/verify-payment", get(verify_payment))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(Stub {
        base_url: format!("http://{addr}"),
        backend,
    })
}

/// Address nothing listens on.
pub async fn closed_address() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

fn ok(message: &str, data: Value) -> Json<Value> {
    Json(json!({ "success": true, "error": false, "message": message, "data": data }))
}

fn failed(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "error": true, "message": message }))
}

async fn read_cart(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let gate = shared.lock().unwrap().cart_gate.clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let mut backend = shared.lock().unwrap();
    backend.record("read-cart", &headers);
    if backend.reject_cart {
        return failed("Please Login").into_response();
    }
    if backend.malformed_cart {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"success\": true, \"data\": [",
        )
            .into_response();
    }
    let lines: Vec<Value> = backend.lines.iter().map(StubLine::to_json).collect();
    ok("ok", Value::Array(lines)).into_response()
}

async fn update_line(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut backend = backend.lock().unwrap();
    backend.record("update-cart-line", &headers);
    if backend.reject_updates {
        return failed("Out of stock");
    }
    let id = body["_id"].as_str().unwrap_or_default().to_string();
    let quantity = body["quantity"].as_u64().unwrap_or_default() as u32;
    match backend.lines.iter_mut().find(|line| line.id == id) {
        Some(line) => {
            line.quantity = quantity;
            ok("Product Updated", json!({}))
        }
        None => failed("Cart product not found"),
    }
}

async fn delete_line(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut backend = backend.lock().unwrap();
    backend.record("delete-cart-line", &headers);
    let id = body["_id"].as_str().unwrap_or_default().to_string();
    let before = backend.lines.len();
    backend.lines.retain(|line| line.id != id);
    if backend.lines.len() == before {
        return failed("Cart product not found");
    }
    ok("Product Deleted From Cart", json!({}))
}

async fn cart_count(State(backend): State<Shared>, headers: HeaderMap) -> Json<Value> {
    let mut backend = backend.lock().unwrap();
    backend.record("cart-count", &headers);
    let count = backend.lines.len();
    ok("ok", json!({ "count": count }))
}

async fn checkout(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    backend.record("create-checkout-session", &headers);
    backend.checkout_bodies.push(body);
    if backend.fail_checkout {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Stripe is unavailable" })),
        )
            .into_response();
    }
    match &backend.checkout_id {
        Some(id) => Json(json!({ "id": id, "object": "checkout.session" })).into_response(),
        None => Json(json!({ "message": "No such price" })).into_response(),
    }
}

async fn order_list(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let mut backend = backend.lock().unwrap();
    backend.record("read-order-history", &headers);
    if backend.orders_unauthorized {
        return (StatusCode::UNAUTHORIZED, failed("Please Login")).into_response();
    }
    match &backend.orders {
        Some(orders) => ok("Order list", orders.clone()).into_response(),
        None => Json(json!({ "success": true, "error": false, "message": "Order list" }))
            .into_response(),
    }
}

async fn verify_payment(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    backend.record("verify-payment", &headers);
    if let Some(session_id) = query.get("session_id") {
        backend.verified_sessions.push(session_id.clone());
    }
    if backend.fail_verify {
        return (
            StatusCode::BAD_REQUEST,
            failed("Payment not completed"),
        )
            .into_response();
    }
    ok("Order saved successfully", json!({})).into_response()
}
