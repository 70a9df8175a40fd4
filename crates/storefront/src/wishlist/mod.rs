//! Wishlist page.

pub mod store;
pub mod view;

pub use store::{InMemoryWishlists, WishlistOwner, WishlistStore};
pub use view::{WishlistCard, WishlistView};
