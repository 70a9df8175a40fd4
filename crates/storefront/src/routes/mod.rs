//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check (registered by the app)
//!
//! # Orders
//! POST /checkout/complete         - Checkout hand-off (JSON receipt), 303 to confirmation
//! GET  /orders/confirmation       - One-time order confirmation
//!
//! # Wishlist
//! GET  /wishlist                  - Saved items
//! POST /wishlist                  - Save an item
//! POST /wishlist/{id}/remove      - Remove an item
//! ```

pub mod orders;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/confirmation", get(orders::confirmation))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).post(wishlist::add))
        .route("/{id}/remove", post(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/complete", post(orders::complete_checkout))
        .nest("/orders", order_routes())
        .nest("/wishlist", wishlist_routes())
}
