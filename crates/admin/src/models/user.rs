//! Identity supplied by the authentication gateway.
//!
//! The gateway in front of the admin panel authenticates the user and
//! forwards the result as trusted request headers.

use serde::{Deserialize, Serialize};

use kestrel_core::{Role, UserId};

/// Header carrying the authenticated user's stable ID.
pub const AUTH_USER_HEADER: &str = "x-auth-user";

/// Header carrying the authenticated user's role.
pub const AUTH_ROLE_HEADER: &str = "x-auth-role";

/// Header carrying the user's display name (optional).
pub const AUTH_NAME_HEADER: &str = "x-auth-name";

/// The signed-in user for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
