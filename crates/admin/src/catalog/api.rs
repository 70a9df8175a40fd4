//! Product API contract.
//!
//! The catalog view talks to the product backend only through
//! [`ProductApi`]. Request bodies and response envelopes mirror the
//! backend's JSON:
//!
//! ```text
//! GET    /products?search=<term>&limit=1000  -> { data: { products: [Product] } }
//! POST   /products                           -> { data: Product }
//! PUT    /products/{id}                      -> { data: Product }
//! DELETE /products/{id}                      -> 2xx
//! error                                      -> { message: string }
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kestrel_core::{Price, Product, ProductId, ProductImage};

/// Upper bound on products requested per listing.
pub const PRODUCT_FETCH_LIMIT: usize = 1000;

/// Errors returned by the product API.
#[derive(Debug, Error)]
pub enum CatalogApiError {
    /// The request never produced an HTTP response.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// A success response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl CatalogApiError {
    /// The backend's own message if it sent one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the backend supplied a structured error message.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Api { message: Some(m), .. } if !m.trim().is_empty())
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub category: String,
    pub description: String,
    pub images: Vec<ProductImage>,
}

/// Body of an update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductUpdate {
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub description: String,
    pub images: Vec<ProductImage>,
}

/// `{ data: T }` envelope wrapping every success body.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Payload of a listing response.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductPage {
    pub products: Vec<Product>,
}

/// `{ message }` error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Remote product store used by the catalog view.
pub trait ProductApi: Send + Sync {
    /// List up to [`PRODUCT_FETCH_LIMIT`] products, filtered by name when
    /// `search` is non-empty.
    fn list_products(
        &self,
        search: &str,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogApiError>> + Send;

    /// Create a product and return the stored record.
    fn create_product(
        &self,
        input: &NewProduct,
    ) -> impl Future<Output = Result<Product, CatalogApiError>> + Send;

    /// Replace a product's editable fields and return the stored record.
    fn update_product(
        &self,
        id: &ProductId,
        input: &ProductUpdate,
    ) -> impl Future<Output = Result<Product, CatalogApiError>> + Send;

    /// Delete a product.
    fn delete_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<(), CatalogApiError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = CatalogApiError::Api {
            status: 409,
            message: Some("Product name already exists".to_string()),
        };
        assert!(err.is_structured());
        assert_eq!(
            err.user_message("Operation failed"),
            "Product name already exists"
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = CatalogApiError::Api {
            status: 500,
            message: None,
        };
        assert!(!err.is_structured());
        assert_eq!(err.user_message("Delete failed"), "Delete failed");

        let err = CatalogApiError::Decode("missing field `data`".to_string());
        assert_eq!(err.user_message("Failed to fetch products"), "Failed to fetch products");
    }

    #[test]
    fn test_blank_server_message_is_not_structured() {
        let err = CatalogApiError::Api {
            status: 400,
            message: Some("  ".to_string()),
        };
        assert_eq!(err.user_message("Operation failed"), "Operation failed");
    }

    #[test]
    fn test_create_body_shape() {
        let body = NewProduct {
            name: "Widget".to_string(),
            price: Price::from_cents(999).unwrap(),
            stock: 5,
            category: "Other".to_string(),
            description: String::new(),
            images: vec![ProductImage {
                url: "https://cdn.test/w.png".to_string(),
                alt: Some("Widget".to_string()),
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Widget",
                "price": 9.99,
                "stock": 5,
                "category": "Other",
                "description": "",
                "images": [{"url": "https://cdn.test/w.png", "alt": "Widget"}]
            })
        );
    }

    #[test]
    fn test_list_envelope_parses() {
        let json = r#"{"data": {"products": [{"_id": "a", "name": "A", "price": 1}]}}"#;
        let envelope: DataEnvelope<ProductPage> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.products.len(), 1);
    }
}
