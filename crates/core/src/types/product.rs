//! Product records as exchanged with the product API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A catalog product.
///
/// The backend names the identifier `_id`; `id` is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// The first image, if the product has one with a non-empty URL.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first().filter(|image| !image.url.is_empty())
    }
}

/// A saved product in a shopper's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl WishlistItem {
    /// The first image, if the item has one with a non-empty URL.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first().filter(|image| !image.url.is_empty())
    }

    /// Alt text for the primary image, falling back to the item name.
    #[must_use]
    pub fn image_alt(&self) -> &str {
        self.primary_image()
            .and_then(|image| image.alt.as_deref())
            .unwrap_or(&self.name)
    }
}

impl From<&Product> for WishlistItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone().unwrap_or_default(),
            price: product.price,
            images: product.images.clone(),
        }
    }
}
