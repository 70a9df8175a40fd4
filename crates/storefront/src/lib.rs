//! Kestrel Market Storefront library.
//!
//! This crate provides the storefront pages as a library, allowing them to
//! be tested and reused:
//!
//! - [`order_confirmation`] - One-time order confirmation with a timed overlay
//! - [`wishlist`] - Saved items backed by a shared wishlist store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod order_confirmation;
pub mod routes;
pub mod state;
pub mod wishlist;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the storefront router with sessions, security headers and
/// request tracing.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    let router = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer);

    middleware::with_security_headers(router)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
