//! Unified error handling for admin.
//!
//! Only failures a handler cannot render as part of the catalog page become
//! an `AppError`. Failed product mutations are shown as page alerts instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };
        tracing::debug!(error = %self, status = %status, "Admin request rejected");

        (status, self.to_string()).into_response()
    }
}

/// Set the Sentry user context from the gateway-supplied identity.
pub fn set_sentry_user(user_id: &str, name: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: name.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product p-123".to_string());
        assert_eq!(err.to_string(), "Not found: product p-123");

        let err = AppError::Forbidden("Only admins can delete products".to_string());
        assert_eq!(err.to_string(), "Forbidden: Only admins can delete products");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
    }
}
