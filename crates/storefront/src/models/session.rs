//! Session keys.
//!
//! The session is the storefront's navigation state: values written by one
//! request and read by a later one.

/// Session keys for navigation state.
pub mod keys {
    /// One-shot `OrderReceipt` handed from checkout to the confirmation page.
    pub const ORDER_CONFIRMATION: &str = "order_confirmation";

    /// The visitor's `WishlistOwner` key.
    pub const WISHLIST_OWNER: &str = "wishlist_owner";
}
