//! Request ID middleware for request tracing and correlation.
//!
//! An upstream proxy may already have assigned an ID; otherwise a UUID v4 is
//! generated. The ID is recorded on the request span, tagged on the Sentry
//! scope and echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted verbatim.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Use the upstream ID if it is sane, otherwise mint one.
fn resolve_request_id(upstream: Option<&str>) -> String {
    upstream
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_kept() {
        assert_eq!(resolve_request_id(Some("cf-ray-123")), "cf-ray-123");
    }

    #[test]
    fn test_missing_or_oversized_id_is_replaced() {
        let minted = resolve_request_id(None);
        assert!(Uuid::parse_str(&minted).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_ne!(resolve_request_id(Some(&long)), long);
        assert_ne!(resolve_request_id(Some("   ")), "   ");
    }
}
