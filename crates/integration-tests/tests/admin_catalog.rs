//! Integration tests for the admin catalog pages.
//!
//! Drives the admin router in-process with gateway identity headers; the
//! product API is the in-process fake.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use tower::ServiceExt;

use kestrel_admin::state::AppState;
use kestrel_integration_tests::{FakeCatalog, admin_config, body_text, location, product_json};

async fn setup() -> (FakeCatalog, Router) {
    let mut lamp = product_json("p-1", "Brass Lamp", 25.5, 3);
    lamp["description"] = serde_json::json!("Hand-polished brass");
    let fake = FakeCatalog::spawn(vec![lamp, product_json("p-2", "Oak Chair", 80.0, 0)]).await;
    let state = AppState::new(admin_config(fake.base_url())).unwrap();
    (fake, kestrel_admin::app(state))
}

fn get_as(uri: &str, user: &str, role: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-auth-user", user)
        .header("x-auth-role", role)
        .body(Body::empty())
        .unwrap()
}

fn post_as(uri: &str, user: &str, role: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-auth-user", user)
        .header("x-auth-role", role)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let (_fake, app) = setup().await;

    let response = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

// ============================================================================
// Access
// ============================================================================

#[tokio::test]
async fn test_anonymous_is_redirected_without_fetch() {
    let (fake, app) = setup().await;

    let response = send(
        &app,
        Request::builder().uri("/products").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_customer_is_redirected_without_fetch() {
    let (fake, app) = setup().await;

    let response = send(&app, get_as("/products", "u-9", "customer")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(fake.requests().is_empty());
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_admin_sees_products_with_actions() {
    let (fake, app) = setup().await;

    let response = send(&app, get_as("/products", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Brass Lamp"));
    assert!(html.contains("$25.50"));
    assert!(html.contains("Oak Chair"));
    assert!(html.contains("<th>Description</th>"));
    assert!(html.contains("<td>Hand-polished brass</td>"));
    assert!(html.contains("/products/p-1/edit"));
    assert!(html.contains("/products/p-1/delete"));

    let gets = fake.requests_with(&Method::GET);
    assert_eq!(gets.len(), 1);
    assert!(gets[0].query.as_deref().unwrap().contains("limit=1000"));
}

#[tokio::test]
async fn test_search_filters_listing() {
    let (fake, app) = setup().await;

    let response = send(&app, get_as("/products?search=chair", "u-1", "editor")).await;
    let html = body_text(response).await;
    assert!(html.contains("Oak Chair"));
    assert!(!html.contains("Brass Lamp"));
    assert!(html.contains("value=\"chair\""));

    let query = fake.requests()[0].query.clone().unwrap();
    assert!(query.contains("search=chair"));
}

#[tokio::test]
async fn test_failed_fetch_shows_fallback_message() {
    let (fake, app) = setup().await;
    fake.respond_next(StatusCode::INTERNAL_SERVER_ERROR, "");

    let response = send(&app, get_as("/products", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Failed to fetch products"));
}

#[tokio::test]
async fn test_editor_has_no_delete_links() {
    let (_fake, app) = setup().await;

    let html = body_text(send(&app, get_as("/products", "u-2", "editor")).await).await;
    assert!(html.contains("/products/p-1/edit"));
    assert!(!html.contains("/products/p-1/delete"));
}

// ============================================================================
// Create and Update
// ============================================================================

#[tokio::test]
async fn test_create_puts_new_product_first() {
    let (fake, app) = setup().await;
    send(&app, get_as("/products", "u-1", "admin")).await;

    let response = send(
        &app,
        post_as(
            "/products",
            "u-1",
            "admin",
            "name=Walnut+Desk&price=120&stock=2&image=&description=Oak",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Added Walnut Desk"));
    let desk = html.find("Walnut Desk</td>").unwrap();
    let lamp = html.find("Brass Lamp</td>").unwrap();
    assert!(desk < lamp);

    let posts = fake.requests_with(&Method::POST);
    assert_eq!(posts.len(), 1);
    let body = posts[0].body.as_ref().unwrap();
    assert_eq!(body["category"], "Other");
    assert_eq!(body["images"], serde_json::json!([]));
    assert_eq!(body["stock"], 2);
}

#[tokio::test]
async fn test_invalid_price_sends_nothing() {
    let (fake, app) = setup().await;

    let response = send(
        &app,
        post_as("/products", "u-1", "admin", "name=Desk&price=abc&stock=1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("role=\"alert\""));
    assert!(html.contains("Price must be a non-negative number"));
    assert!(fake.requests_with(&Method::POST).is_empty());
}

#[tokio::test]
async fn test_failed_create_shows_server_message() {
    let (fake, app) = setup().await;
    fake.respond_next(
        StatusCode::CONFLICT,
        r#"{"message": "Product name already exists"}"#,
    );

    let response = send(
        &app,
        post_as("/products", "u-1", "admin", "name=Brass+Lamp&price=1&stock=1"),
    )
    .await;

    let html = body_text(response).await;
    assert!(html.contains("role=\"alert\""));
    assert!(html.contains("Product name already exists"));
    assert_eq!(fake.products().len(), 2);
}

#[tokio::test]
async fn test_edit_then_save_updates_product() {
    let (fake, app) = setup().await;
    send(&app, get_as("/products", "u-2", "editor")).await;

    let html = body_text(send(&app, get_as("/products/p-1/edit", "u-2", "editor")).await).await;
    assert!(html.contains("Edit Brass Lamp"));
    assert!(html.contains("value=\"Brass Lamp\""));

    let response = send(
        &app,
        post_as(
            "/products",
            "u-2",
            "editor",
            "name=Brass+Lamp+XL&price=30&stock=4&image=&description=",
        ),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("Saved Brass Lamp XL"));
    assert!(html.contains("Add product"));

    let puts = fake.requests_with(&Method::PUT);
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "/api/products/p-1");
    assert!(fake.requests_with(&Method::POST).is_empty());
}

#[tokio::test]
async fn test_edit_unknown_product_is_not_found() {
    let (_fake, app) = setup().await;
    send(&app, get_as("/products", "u-1", "admin")).await;

    let response = send(&app, get_as("/products/missing/edit", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmounted_view_starts_empty() {
    let fake = FakeCatalog::spawn(vec![product_json("p-1", "Brass Lamp", 25.5, 3)]).await;
    let state = AppState::new(admin_config(fake.base_url())).unwrap();
    let app = kestrel_admin::app(state.clone());

    send(&app, get_as("/products", "u-1", "admin")).await;
    let response = send(&app, get_as("/products/p-1/edit", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::OK);

    state
        .unmount_catalog_view(&kestrel_core::UserId::new("u-1"))
        .await;

    let response = send(&app, get_as("/products/p-1/edit", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_editor_cannot_open_delete_prompt() {
    let (_fake, app) = setup().await;
    send(&app, get_as("/products", "u-2", "editor")).await;

    let response = send(&app, get_as("/products/p-1/delete", "u-2", "editor")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_editor_delete_is_refused_without_request() {
    let (fake, app) = setup().await;
    send(&app, get_as("/products", "u-2", "editor")).await;

    let response = send(
        &app,
        post_as("/products/p-1/delete", "u-2", "editor", "confirm=yes"),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("Only admins can delete products"));
    assert!(fake.requests_with(&Method::DELETE).is_empty());
}

#[tokio::test]
async fn test_admin_delete_prompt_names_product() {
    let (_fake, app) = setup().await;
    send(&app, get_as("/products", "u-1", "admin")).await;

    let response = send(&app, get_as("/products/p-1/delete", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Brass Lamp"));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let (fake, app) = setup().await;
    send(&app, get_as("/products", "u-1", "admin")).await;

    let response = send(
        &app,
        post_as("/products/p-1/delete", "u-1", "admin", "confirm=no"),
    )
    .await;
    assert!(body_text(response).await.contains("Brass Lamp"));
    assert!(fake.requests_with(&Method::DELETE).is_empty());
}

#[tokio::test]
async fn test_confirmed_delete_removes_product() {
    let (fake, app) = setup().await;
    send(&app, get_as("/products", "u-1", "admin")).await;

    let response = send(
        &app,
        post_as("/products/p-1/delete", "u-1", "admin", "confirm=yes"),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("Deleted Brass Lamp"));
    assert!(!html.contains("/products/p-1/edit"));
    assert!(html.contains("Oak Chair"));

    let deletes = fake.requests_with(&Method::DELETE);
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "/api/products/p-1");
    assert_eq!(fake.products().len(), 1);
}

#[tokio::test]
async fn test_delete_with_slash_in_id_reaches_the_right_product() {
    let fake = FakeCatalog::spawn(vec![
        product_json("sku", "Plain Sku", 5.0, 1),
        product_json("sku/42", "Slash Sku", 6.0, 1),
    ])
    .await;
    let app = kestrel_admin::app(AppState::new(admin_config(fake.base_url())).unwrap());

    let html = body_text(send(&app, get_as("/products", "u-1", "admin")).await).await;
    assert!(html.contains("/products/sku%2F42/delete"));

    let response = send(&app, get_as("/products/sku%2F42/delete", "u-1", "admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("action=\"/products/sku%2F42/delete\""));

    let response = send(
        &app,
        post_as("/products/sku%2F42/delete", "u-1", "admin", "confirm=yes"),
    )
    .await;
    assert!(body_text(response).await.contains("Deleted Slash Sku"));

    let deletes = fake.requests_with(&Method::DELETE);
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "/api/products/sku%2F42");
    let remaining = fake.products();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["_id"], "sku");
}

#[tokio::test]
async fn test_failed_delete_keeps_product() {
    let (fake, app) = setup().await;
    send(&app, get_as("/products", "u-1", "admin")).await;
    fake.respond_next(StatusCode::INTERNAL_SERVER_ERROR, "");

    let response = send(
        &app,
        post_as("/products/p-1/delete", "u-1", "admin", "confirm=yes"),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("Delete failed"));
    assert!(html.contains("/products/p-1/edit"));
}
