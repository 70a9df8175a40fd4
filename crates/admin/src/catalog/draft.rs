//! Product form draft.
//!
//! The draft holds raw form input exactly as typed. It is only coerced into
//! typed values when submitted.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kestrel_core::{Price, PriceError, Product, ProductImage};

use super::api::{NewProduct, ProductUpdate};

/// Why a draft could not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Product name is required")]
    MissingName,
    #[error("Price must be a non-negative number")]
    InvalidPrice(#[source] PriceError),
    #[error("Stock must be a whole number of at least 0")]
    InvalidStock(String),
}

/// A form field of the product draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Price,
    Stock,
    Image,
    Description,
}

/// Unsaved product form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub image: String,
    pub description: String,
}

/// A draft whose numeric fields have been coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDraft {
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub image: String,
    pub description: String,
}

impl ProductDraft {
    /// Mirror an existing product for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.amount().normalize().to_string(),
            stock: product.stock.to_string(),
            image: product
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
            description: product.description.clone(),
        }
    }

    /// Set one field to the raw input value.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Price => self.price = value,
            DraftField::Stock => self.stock = value,
            DraftField::Image => self.image = value,
            DraftField::Description => self.description = value,
        }
    }

    /// Coerce price and stock into numbers.
    ///
    /// # Errors
    ///
    /// Returns `DraftError` if the name is blank or a number is invalid.
    pub fn parse(&self) -> Result<ParsedDraft, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }

        let price = self
            .price
            .parse::<Price>()
            .map_err(DraftError::InvalidPrice)?;
        let stock = parse_stock(&self.stock)?;

        Ok(ParsedDraft {
            name: name.to_string(),
            price,
            stock,
            image: self.image.trim().to_string(),
            description: self.description.clone(),
        })
    }
}

/// Accept whole numbers, including forms like "5.0".
fn parse_stock(raw: &str) -> Result<u32, DraftError> {
    let invalid = || DraftError::InvalidStock(raw.to_string());
    let value: Decimal = raw.trim().parse().map_err(|_| invalid())?;

    if !value.fract().is_zero() {
        return Err(invalid());
    }
    value.to_u32().ok_or_else(invalid)
}

impl ParsedDraft {
    /// The image list sent to the backend: the draft's single URL, if any,
    /// with the product name as alt text.
    #[must_use]
    pub fn images(&self) -> Vec<ProductImage> {
        if self.image.is_empty() {
            return Vec::new();
        }
        vec![ProductImage {
            url: self.image.clone(),
            alt: Some(self.name.clone()),
        }]
    }

    /// Build a create request body.
    #[must_use]
    pub fn to_new_product(&self, category: &str) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            category: category.to_string(),
            description: self.description.clone(),
            images: self.images(),
        }
    }

    /// Build an update request body.
    #[must_use]
    pub fn to_update(&self) -> ProductUpdate {
        ProductUpdate {
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            description: self.description.clone(),
            images: self.images(),
        }
    }
}
