//! Kestrel Core - Shared types library.
//!
//! This crate provides common types used across all Kestrel components:
//! - `storefront` - Customer-facing pages (order confirmation, wishlist)
//! - `admin` - Catalog administration for admins and editors
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, receipts and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
