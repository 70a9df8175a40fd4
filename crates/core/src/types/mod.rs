//! Core types for Kestrel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod role;

pub use id::*;
pub use order::OrderReceipt;
pub use price::{Price, PriceError};
pub use product::{Product, ProductImage, WishlistItem};
pub use role::{Capability, Role};
