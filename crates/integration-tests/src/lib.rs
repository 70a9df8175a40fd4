//! Integration test support for Kestrel Market.
//!
//! Tests drive the admin and storefront routers in-process with
//! `tower::ServiceExt::oneshot`. The admin panel talks to a [`FakeCatalog`]:
//! a small axum server on an ephemeral port that speaks the product API's
//! JSON and records every request it receives.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kestrel-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - `reqwest` client against the product API contract
//! - `admin_catalog` - Catalog page access, listing and mutations
//! - `storefront_pages` - Order confirmation and wishlist flows

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

use kestrel_admin::config::{AdminConfig, CatalogApiConfig};
use kestrel_storefront::config::StorefrontConfig;

/// Bearer token the admin config carries in tests.
pub const TEST_API_TOKEN: &str = "tok_Zq8vL2mX9rKp4Wn7";

/// A request received by the fake product API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Response served in place of the next request's normal handling.
#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
}

#[derive(Default)]
struct FakeCatalogInner {
    products: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    canned: Mutex<Option<CannedResponse>>,
    next_id: AtomicU32,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeCatalogInner {
    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Option<Value> {
        let parsed = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };

        lock(&self.requests).push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(String::from),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body: parsed.clone(),
        });

        parsed
    }

    fn take_canned(&self) -> Option<Response> {
        lock(&self.canned).take().map(|canned| {
            Response::builder()
                .status(canned.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(canned.body))
                .expect("canned response")
        })
    }
}

/// In-process stand-in for the product API.
///
/// Serves `GET/POST /api/products` and `PUT/DELETE /api/products/{id}`.
#[derive(Clone)]
pub struct FakeCatalog {
    addr: SocketAddr,
    inner: Arc<FakeCatalogInner>,
}

impl FakeCatalog {
    /// Start the fake API seeded with `products`.
    pub async fn spawn(products: Vec<Value>) -> Self {
        let inner = Arc::new(FakeCatalogInner {
            products: Mutex::new(products),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/products", get(list_products).post(create_product))
            .route(
                "/api/products/{id}",
                put(update_product).delete(delete_product),
            )
            .with_state(Arc::clone(&inner));

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind fake catalog");
        let addr = listener.local_addr().expect("fake catalog address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("fake catalog server");
        });

        Self { addr, inner }
    }

    /// Base URL to configure the product client with.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("fake catalog url")
    }

    /// Serve `status` with the raw `body` for the next request only.
    pub fn respond_next(&self, status: StatusCode, body: &str) {
        *lock(&self.inner.canned) = Some(CannedResponse {
            status,
            body: body.to_string(),
        });
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.inner.requests).clone()
    }

    /// Requests received with `method`.
    #[must_use]
    pub fn requests_with(&self, method: &Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| &r.method == method)
            .collect()
    }

    /// Current backend records.
    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        lock(&self.inner.products).clone()
    }
}

// =============================================================================
// Fake API Handlers
// =============================================================================

type Shared = State<Arc<FakeCatalogInner>>;

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Product not found" })),
    )
        .into_response()
}

async fn list_products(State(inner): Shared, uri: Uri, headers: HeaderMap) -> Response {
    inner.record(Method::GET, &uri, &headers, &Bytes::new());
    if let Some(canned) = inner.take_canned() {
        return canned;
    }

    let search = uri.query().and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == "search")
            .map(|(_, value)| value.to_lowercase())
    });

    let products: Vec<Value> = lock(&inner.products)
        .iter()
        .filter(|p| {
            search.as_ref().is_none_or(|term| {
                p["name"]
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(term.as_str())
            })
        })
        .cloned()
        .collect();

    Json(json!({ "data": { "products": products } })).into_response()
}

async fn create_product(
    State(inner): Shared,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let parsed = inner.record(Method::POST, &uri, &headers, &body);
    if let Some(canned) = inner.take_canned() {
        return canned;
    }

    let Some(Value::Object(mut product)) = parsed else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid product" })),
        )
            .into_response();
    };

    let id = inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
    product.insert("_id".to_string(), Value::String(format!("new-{id}")));
    let product = Value::Object(product);
    lock(&inner.products).push(product.clone());

    (StatusCode::CREATED, Json(json!({ "data": product }))).into_response()
}

async fn update_product(
    State(inner): Shared,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let parsed = inner.record(Method::PUT, &uri, &headers, &body);
    if let Some(canned) = inner.take_canned() {
        return canned;
    }

    let mut products = lock(&inner.products);
    let Some(existing) = products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return not_found();
    };
    if let (Some(target), Some(Value::Object(fields))) = (existing.as_object_mut(), parsed) {
        target.extend(fields);
    }

    Json(json!({ "data": existing.clone() })).into_response()
}

async fn delete_product(
    State(inner): Shared,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    inner.record(Method::DELETE, &uri, &headers, &Bytes::new());
    if let Some(canned) = inner.take_canned() {
        return canned;
    }

    let mut products = lock(&inner.products);
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() == before {
        return not_found();
    }

    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Fixtures
// =============================================================================

/// A backend product record.
#[must_use]
pub fn product_json(id: &str, name: &str, price: f64, stock: u32) -> Value {
    json!({
        "_id": id,
        "name": name,
        "price": price,
        "stock": stock,
        "description": "",
        "category": "Other",
        "images": []
    })
}

/// Admin configuration pointed at `catalog_url`.
#[must_use]
pub fn admin_config(catalog_url: Url) -> AdminConfig {
    AdminConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        login_url: "/login".to_string(),
        catalog_api: CatalogApiConfig {
            base_url: catalog_url,
            token: Some(SecretString::from(TEST_API_TOKEN)),
            timeout: Duration::from_secs(5),
        },
        view_idle: Duration::from_secs(60),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Storefront configuration served over plain HTTP.
#[must_use]
pub fn storefront_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        catalog_path: "/products".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The `name=value` part of a response's `Set-Cookie` header.
#[must_use]
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(String::from)
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
