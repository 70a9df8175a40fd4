//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (correlate logs, Sentry events and responses)
//! 4. Security headers
//! 5. Session layer (tower-sessions with in-memory store)

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::with_security_headers;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
