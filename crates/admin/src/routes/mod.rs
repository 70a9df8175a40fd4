//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check (registered by the app)
//!
//! # Catalog
//! GET  /products                    - Mount the catalog view and load (?search=)
//! POST /products                    - Submit the product form (create or update)
//! GET  /products/{id}/edit          - Enter edit mode for a cached product
//! POST /products/edit/cancel        - Leave edit mode
//! GET  /products/{id}/delete        - Delete confirmation prompt (admins only)
//! POST /products/{id}/delete        - Delete (`confirm=yes` confirms)
//! ```

pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::submit))
        .route("/edit/cancel", post(products::cancel_edit))
        .route("/{id}/edit", get(products::edit))
        .route(
            "/{id}/delete",
            get(products::confirm_delete).post(products::delete),
        )
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/products", product_routes())
}
