//! Wishlist view model.
//!
//! Holds no authoritative state: every render observes a fresh snapshot of
//! the store.

use kestrel_core::{ProductId, WishlistItem};

use super::store::{WishlistOwner, WishlistStore};

/// One rendered wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistCard {
    pub id: String,
    /// `id` percent-encoded for use as a URL path segment.
    pub path_id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: Option<String>,
    pub image_alt: String,
}

impl From<&WishlistItem> for WishlistCard {
    fn from(item: &WishlistItem) -> Self {
        Self {
            id: item.id.to_string(),
            path_id: urlencoding::encode(item.id.as_str()).into_owned(),
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price.display(),
            image_url: item.primary_image().map(|image| image.url.clone()),
            image_alt: item.image_alt().to_string(),
        }
    }
}

/// What the wishlist page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistView {
    Empty,
    Items(Vec<WishlistCard>),
}

impl WishlistView {
    /// Build the view from the store's current contents.
    pub async fn observe<S: WishlistStore>(store: &S, owner: &WishlistOwner) -> Self {
        let items = store.items(owner).await;
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Items(items.iter().map(WishlistCard::from).collect())
        }
    }

    /// Ask the store to remove an item.
    pub async fn remove<S: WishlistStore>(store: &S, owner: &WishlistOwner, id: &ProductId) -> bool {
        let removed = store.remove(owner, id).await;
        tracing::debug!(%owner, product_id = %id, removed, "Wishlist removal");
        removed
    }

    /// The rendered cards, empty for [`WishlistView::Empty`].
    #[must_use]
    pub fn cards(&self) -> &[WishlistCard] {
        match self {
            Self::Empty => &[],
            Self::Items(cards) => cards,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kestrel_core::{Price, ProductImage};

    use super::super::store::InMemoryWishlists;
    use super::*;

    fn lamp() -> WishlistItem {
        WishlistItem {
            id: ProductId::new("p-7"),
            name: "Lamp".to_string(),
            category: "Lighting".to_string(),
            price: Price::from_cents(4000).unwrap(),
            images: vec![ProductImage {
                url: "https://cdn.test/lamp.png".to_string(),
                alt: None,
            }],
        }
    }

    #[test]
    fn test_card_formats_item() {
        let card = WishlistCard::from(&lamp());
        assert_eq!(card.price, "$40.00");
        assert_eq!(card.image_url.as_deref(), Some("https://cdn.test/lamp.png"));
        assert_eq!(card.image_alt, "Lamp");
        assert_eq!(card.category, "Lighting");
        assert_eq!(card.path_id, "p-7");
    }

    #[test]
    fn test_card_skips_blank_image_and_encodes_id() {
        let mut item = lamp();
        item.id = ProductId::new("sku/42");
        item.images = vec![ProductImage {
            url: String::new(),
            alt: Some("Unused".to_string()),
        }];

        let card = WishlistCard::from(&item);
        assert!(card.image_url.is_none());
        assert_eq!(card.image_alt, "Lamp");
        assert_eq!(card.id, "sku/42");
        assert_eq!(card.path_id, "sku%2F42");
    }

    #[tokio::test]
    async fn test_empty_wishlist() {
        let store = InMemoryWishlists::new();
        let owner = WishlistOwner::generate();
        assert_eq!(WishlistView::observe(&store, &owner).await, WishlistView::Empty);
    }

    #[tokio::test]
    async fn test_removing_last_item_shows_empty_state() {
        let store = InMemoryWishlists::new();
        let owner = WishlistOwner::generate();
        store.add(&owner, lamp()).await;

        let view = WishlistView::observe(&store, &owner).await;
        assert_eq!(view.cards().len(), 1);

        assert!(WishlistView::remove(&store, &owner, &ProductId::new("p-7")).await);
        assert_eq!(WishlistView::observe(&store, &owner).await, WishlistView::Empty);
    }
}
