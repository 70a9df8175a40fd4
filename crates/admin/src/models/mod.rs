//! Domain models for admin.

pub mod user;

pub use user::{AUTH_NAME_HEADER, AUTH_ROLE_HEADER, AUTH_USER_HEADER, CurrentUser};
