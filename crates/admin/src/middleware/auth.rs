//! Authorization extractor for the catalog view.
//!
//! Identity comes from the authentication gateway's trusted headers. A
//! request without an identity, or with a role that may not open the
//! catalog, never reaches the handler and so never triggers a fetch.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use kestrel_core::{Role, UserId};

use crate::catalog::authorize;
use crate::error::set_sentry_user;
use crate::models::{AUTH_NAME_HEADER, AUTH_ROLE_HEADER, AUTH_USER_HEADER, CurrentUser};
use crate::state::AppState;

/// Extractor that requires a user allowed to open the catalog.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireCatalogAccess(user): RequireCatalogAccess,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name())
/// }
/// ```
pub struct RequireCatalogAccess(pub CurrentUser);

/// Returned when the caller may not open the catalog: a redirect to the
/// login entry point.
#[derive(Debug)]
pub struct CatalogAccessRejection {
    login_url: String,
}

impl IntoResponse for CatalogAccessRejection {
    fn into_response(self) -> Response {
        Redirect::to(&self.login_url).into_response()
    }
}

impl FromRequestParts<AppState> for RequireCatalogAccess {
    type Rejection = CatalogAccessRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match current_user_from_headers(&parts.headers) {
            Some(user) if authorize(Some(&user)).is_ok() => user,
            other => {
                tracing::debug!(
                    path = %parts.uri.path(),
                    role = ?other.map(|u| u.role),
                    "Catalog access denied"
                );
                return Err(CatalogAccessRejection {
                    login_url: state.config().login_url.clone(),
                });
            }
        };

        set_sentry_user(user.id.as_str(), user.name.as_deref());
        Ok(Self(user))
    }
}

/// Read the gateway identity headers.
///
/// Returns `None` if the user header is missing or blank, or the role is
/// missing or unrecognized.
#[must_use]
pub fn current_user_from_headers(headers: &HeaderMap) -> Option<CurrentUser> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let id = header(AUTH_USER_HEADER)?;
    let role = header(AUTH_ROLE_HEADER)?.parse::<Role>().ok()?;

    Some(CurrentUser {
        id: UserId::new(id),
        name: header(AUTH_NAME_HEADER).map(String::from),
        role,
    })
}
