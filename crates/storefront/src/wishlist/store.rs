//! Wishlist storage.
//!
//! The wishlist is owned by the store, not by the page. Pages read snapshots
//! and ask the store to change it.

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use kestrel_core::{ProductId, WishlistItem};

/// Anonymous key identifying one shopper's wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistOwner(Uuid);

impl WishlistOwner {
    /// Generate a fresh owner key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for WishlistOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared wishlist collection.
pub trait WishlistStore: Send + Sync {
    /// Snapshot of `owner`'s items, oldest first.
    fn items(&self, owner: &WishlistOwner) -> impl Future<Output = Vec<WishlistItem>> + Send;

    /// Save `item`. Returns `false` if it was already saved.
    fn add(&self, owner: &WishlistOwner, item: WishlistItem) -> impl Future<Output = bool> + Send;

    /// Remove the item with `id`. Returns `false` if it was not saved.
    fn remove(&self, owner: &WishlistOwner, id: &ProductId)
    -> impl Future<Output = bool> + Send;
}

/// Process-wide in-memory wishlists.
#[derive(Debug, Default)]
pub struct InMemoryWishlists {
    lists: RwLock<HashMap<WishlistOwner, Vec<WishlistItem>>>,
}

impl InMemoryWishlists {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WishlistStore for InMemoryWishlists {
    async fn items(&self, owner: &WishlistOwner) -> Vec<WishlistItem> {
        self.lists
            .read()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    async fn add(&self, owner: &WishlistOwner, item: WishlistItem) -> bool {
        let mut lists = self.lists.write().await;
        let items = lists.entry(*owner).or_default();
        if items.iter().any(|existing| existing.id == item.id) {
            return false;
        }
        items.push(item);
        true
    }

    async fn remove(&self, owner: &WishlistOwner, id: &ProductId) -> bool {
        let mut lists = self.lists.write().await;
        let Some(items) = lists.get_mut(owner) else {
            return false;
        };

        let before = items.len();
        items.retain(|item| &item.id != id);
        let removed = items.len() != before;

        if items.is_empty() {
            lists.remove(owner);
        }
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kestrel_core::Price;

    use super::*;

    fn item(id: &str) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            category: "Other".to_string(),
            price: Price::from_cents(1500).unwrap(),
            images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = InMemoryWishlists::new();
        let owner = WishlistOwner::generate();

        assert!(store.add(&owner, item("a")).await);
        assert!(!store.add(&owner, item("a")).await);
        assert!(store.add(&owner, item("b")).await);

        let ids: Vec<_> = store
            .items(&owner)
            .await
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, [ProductId::new("a"), ProductId::new("b")]);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryWishlists::new();
        let owner = WishlistOwner::generate();
        store.add(&owner, item("a")).await;

        assert!(!store.remove(&owner, &ProductId::new("zzz")).await);
        assert!(store.remove(&owner, &ProductId::new("a")).await);
        assert!(!store.remove(&owner, &ProductId::new("a")).await);
        assert!(store.items(&owner).await.is_empty());
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = InMemoryWishlists::new();
        let alice = WishlistOwner::generate();
        let bob = WishlistOwner::generate();

        store.add(&alice, item("a")).await;
        assert!(store.items(&bob).await.is_empty());
        assert!(!store.remove(&bob, &ProductId::new("a")).await);
        assert_eq!(store.items(&alice).await.len(), 1);
    }
}
