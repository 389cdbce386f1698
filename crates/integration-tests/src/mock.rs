//! In-process stand-in for the catalog backend.
//!
//! Serves the user and product endpoints from memory, keys products by the
//! raw `X-USER-ID` header and records every request it receives. Error
//! responses use the backend's envelope (`{message, status, errors?}`).

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use url::Url;

const IDENTITY_HEADER: &str = "X-USER-ID";

/// One request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    /// Raw `X-USER-ID` header value, if sent.
    pub user_id: Option<String>,
}

#[derive(Debug)]
struct Catalog {
    users: Vec<Value>,
    products: BTreeMap<String, Vec<Value>>,
    next_user_id: i64,
    next_product_id: i64,
    requests: Vec<RecordedRequest>,
    products_body: Option<Value>,
    fail_products: bool,
    product_delays: HashMap<String, Duration>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            products: BTreeMap::new(),
            next_user_id: 1,
            next_product_id: 100,
            requests: Vec::new(),
            products_body: None,
            fail_products: false,
            product_delays: HashMap::new(),
        }
    }
}

/// Shared handle to the mock's data. Clones see the same catalog.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Catalog>>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user.
    pub fn add_user(&self, id: i64, name: &str) {
        let mut catalog = self.lock();
        catalog.users.push(json!({ "id": id, "name": name }));
        catalog.next_user_id = catalog.next_user_id.max(id + 1);
    }

    /// Seed a product owned by `user`. `product` is stored verbatim.
    pub fn add_product(&self, user: i64, product: Value) {
        self.lock()
            .products
            .entry(user.to_string())
            .or_default()
            .push(product);
    }

    /// Answer `GET /products` with `body` instead of the stored list.
    pub fn set_products_body(&self, body: Value) {
        self.lock().products_body = Some(body);
    }

    /// Make every product endpoint answer 500.
    pub fn fail_products(&self, fail: bool) {
        self.lock().fail_products = fail;
    }

    /// Hold `GET /products` for `user` back by `delay`.
    pub fn delay_products_for(&self, user: i64, delay: Duration) {
        self.lock().product_delays.insert(user.to_string(), delay);
    }

    /// Products currently stored for `user`.
    #[must_use]
    pub fn products_of(&self, user: i64) -> Vec<Value> {
        self.lock()
            .products
            .get(&user.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests to the product service.
    #[must_use]
    pub fn product_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with("/products"))
            .collect()
    }

    /// Build the mock's router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/users", get(list_users))
            .route("/users/register", post(register_user))
            .route("/users/{id}", delete(delete_user))
            .route("/products", get(list_products).post(create_product))
            .route("/products/{id}", delete(delete_product))
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone())
    }

    /// Serve the mock on an ephemeral local port and return its base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn spawn(&self) -> io::Result<Url> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Url::parse(&format!("http://{addr}")).map_err(io::Error::other)
    }

    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn record(State(mock): State<MockBackend>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        user_id: identity(request.headers()),
    };
    mock.lock().requests.push(recorded);
    next.run(request).await
}

fn identity(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn envelope(status: StatusCode, message: &str, errors: &[String]) -> Response {
    let mut body = json!({
        "message": message,
        "status": status.as_u16(),
        "timestamp": "2026-01-01T00:00:00.000+00:00",
    });
    if !errors.is_empty() {
        body["errors"] = json!(errors);
    }
    (status, Json(body)).into_response()
}

fn missing_identity() -> Response {
    envelope(
        StatusCode::BAD_REQUEST,
        "Required request header 'X-USER-ID' is not present",
        &[],
    )
}

fn text_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field).and_then(Value::as_str).unwrap_or_default()
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(State(mock): State<MockBackend>) -> Json<Value> {
    Json(Value::Array(mock.lock().users.clone()))
}

async fn register_user(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let name = text_field(&body, "name").trim();
    let email = text_field(&body, "email").trim();
    let password = text_field(&body, "password");

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("name: must not be blank".to_string());
    }
    if !email.contains('@') {
        errors.push("email: must be a well-formed email address".to_string());
    }
    if password.is_empty() {
        errors.push("password: must not be blank".to_string());
    }
    if !errors.is_empty() {
        return envelope(StatusCode::BAD_REQUEST, "Validation failed", &errors);
    }

    let mut catalog = mock.lock();
    if catalog.users.iter().any(|u| text_field(u, "email") == email) {
        return envelope(StatusCode::CONFLICT, "Email already registered", &[]);
    }

    let id = catalog.next_user_id;
    catalog.next_user_id += 1;
    let user = json!({ "id": id, "name": name, "email": email });
    catalog.users.push(user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn delete_user(State(mock): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let mut catalog = mock.lock();
    let before = catalog.users.len();
    catalog
        .users
        .retain(|u| u.get("id").and_then(Value::as_i64) != Some(id));
    if catalog.users.len() == before {
        return envelope(StatusCode::NOT_FOUND, &format!("User {id} not found"), &[]);
    }
    catalog.products.remove(&id.to_string());
    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    let Some(user) = identity(&headers) else {
        return missing_identity();
    };

    let delay = mock.lock().product_delays.get(&user).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let catalog = mock.lock();
    if catalog.fail_products {
        return envelope(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable", &[]);
    }
    if let Some(body) = &catalog.products_body {
        return Json(body.clone()).into_response();
    }
    let products = catalog.products.get(&user).cloned().unwrap_or_default();
    Json(Value::Array(products)).into_response()
}

async fn create_product(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(user) = identity(&headers) else {
        return missing_identity();
    };

    let name = text_field(&body, "name");
    let price = body.get("price").and_then(Value::as_f64).unwrap_or_default();

    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("name: Product name is required".to_string());
    }
    if price <= 0.0 {
        errors.push("price: Price must be positive".to_string());
    }
    if !errors.is_empty() {
        return envelope(StatusCode::BAD_REQUEST, "Validation failed", &errors);
    }

    let mut catalog = mock.lock();
    if catalog.fail_products {
        return envelope(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable", &[]);
    }

    let id = catalog.next_product_id;
    catalog.next_product_id += 1;
    let product = json!({
        "id": id,
        "name": name,
        "price": body["price"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
    });
    catalog
        .products
        .entry(user)
        .or_default()
        .push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn delete_product(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let Some(user) = identity(&headers) else {
        return missing_identity();
    };

    let mut catalog = mock.lock();
    if catalog.fail_products {
        return envelope(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable", &[]);
    }

    let products = catalog.products.entry(user).or_default();
    let before = products.len();
    products.retain(|p| p.get("id").and_then(Value::as_i64) != Some(id));
    if products.len() == before {
        return envelope(StatusCode::NOT_FOUND, &format!("Product {id} not found"), &[]);
    }
    StatusCode::NO_CONTENT.into_response()
}
