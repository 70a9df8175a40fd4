//! HTTP middleware and extractors for admin.

pub mod auth;

pub use auth::{CatalogAccessRejection, RequireCatalogAccess, current_user_from_headers};
