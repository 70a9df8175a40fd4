//! Security headers for every storefront response.
//!
//! Headers are only set when the handler did not set them itself.

use axum::{
    Router,
    http::{
        HeaderName, HeaderValue,
        header::{CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
    },
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Pages use inline styles and show product images from any HTTPS CDN.
const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' https:; \
     form-action 'self'; \
     base-uri 'self'; \
     frame-ancestors 'none'";

/// Wrap `router` with the storefront's security headers.
pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let headers = [
        (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
        (
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
        ),
        (
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ),
    ];

    headers.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(name, value))
    })
}
