//! Roles and the capabilities they grant.
//!
//! Gated actions check a [`Capability`] rather than comparing role names,
//! so adding a role only touches [`Role::capabilities`].

use serde::{Deserialize, Serialize};

/// What a signed-in user may do in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Open the catalog administration view.
    ViewCatalog,
    /// Add new products.
    CreateProduct,
    /// Modify existing products.
    EditProduct,
    /// Remove products.
    DeleteProduct,
}

/// User role as reported by the authentication provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full catalog access, including deletion.
    Admin,
    /// Can create and edit products but not delete them.
    Editor,
    /// Storefront shopper; no catalog access.
    Customer,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewCatalog,
    Capability::CreateProduct,
    Capability::EditProduct,
    Capability::DeleteProduct,
];

const EDITOR_CAPABILITIES: &[Capability] = &[
    Capability::ViewCatalog,
    Capability::CreateProduct,
    Capability::EditProduct,
];

impl Role {
    /// The full capability set granted to this role.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Admin => ADMIN_CAPABILITIES,
            Self::Editor => EDITOR_CAPABILITIES,
            Self::Customer => &[],
        }
    }

    /// Whether this role grants `capability`.
    #[must_use]
    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Editor => write!(f, "editor"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "customer" | "user" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_can_delete() {
        assert!(Role::Admin.can(Capability::DeleteProduct));
        assert!(!Role::Editor.can(Capability::DeleteProduct));
        assert!(!Role::Customer.can(Capability::DeleteProduct));
    }

    #[test]
    fn test_elevated_roles_can_edit() {
        for role in [Role::Admin, Role::Editor] {
            assert!(role.can(Capability::ViewCatalog));
            assert!(role.can(Capability::EditProduct));
            assert!(role.can(Capability::CreateProduct));
        }
        assert!(!Role::Customer.can(Capability::ViewCatalog));
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::Admin, Role::Editor, Role::Customer] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Editor ".parse::<Role>().unwrap(), Role::Editor);
        assert!("superuser".parse::<Role>().is_err());
    }
}
