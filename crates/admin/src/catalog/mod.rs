//! Catalog administration.
//!
//! - [`api`] - The product API seam ([`ProductApi`]) and its wire types
//! - [`client`] - `reqwest` implementation of [`ProductApi`]
//! - [`draft`] - The product form draft and its validation
//! - [`view`] - The per-user catalog view model

pub mod api;
pub mod client;
pub mod draft;
pub mod view;

pub use api::{CatalogApiError, NewProduct, PRODUCT_FETCH_LIMIT, ProductApi, ProductUpdate};
pub use client::CatalogClient;
pub use draft::{DraftError, DraftField, ProductDraft};
pub use view::{
    AccessDenied, Alert, CatalogView, Confirmation, DEFAULT_CATEGORY, DeleteOutcome, LoadOutcome,
    LoadTicket, SubmitOutcome, authorize,
};
