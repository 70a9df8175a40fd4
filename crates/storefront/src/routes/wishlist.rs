//! Wishlist route handlers.
//!
//! Wishlists are keyed by an anonymous owner ID kept in the visitor's
//! session. Mutations redirect back to the wishlist page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use kestrel_core::{Price, ProductId, ProductImage, WishlistItem};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session_keys;
use crate::state::AppState;
use crate::wishlist::{WishlistCard, WishlistOwner, WishlistStore, WishlistView};

/// The wishlist page.
pub const WISHLIST_PATH: &str = "/wishlist";

/// Add-to-wishlist form.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistForm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AddToWishlistForm {
    fn into_item(self) -> Result<WishlistItem> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("product id is required".to_string()));
        }
        let price = self
            .price
            .parse::<Price>()
            .map_err(|e| AppError::BadRequest(format!("invalid price: {e}")))?;
        let images = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .map(|url| ProductImage { url, alt: None })
            .into_iter()
            .collect();

        Ok(WishlistItem {
            id: ProductId::new(id),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price,
            images,
        })
    }
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/index.html")]
pub struct WishlistTemplate {
    pub catalog_path: String,
    pub cards: Vec<WishlistCard>,
}

impl WishlistTemplate {
    /// Render data for an observed view.
    #[must_use]
    pub fn new(view: &WishlistView, catalog_path: impl Into<String>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            cards: view.cards().to_vec(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the visitor's wishlist owner key, if they have one.
async fn get_owner(session: &Session) -> Result<Option<WishlistOwner>> {
    Ok(session
        .get::<WishlistOwner>(session_keys::WISHLIST_OWNER)
        .await?)
}

/// Get the visitor's wishlist owner key, creating one if needed.
async fn get_or_create_owner(session: &Session) -> Result<WishlistOwner> {
    if let Some(owner) = get_owner(session).await? {
        return Ok(owner);
    }

    let owner = WishlistOwner::generate();
    session
        .insert(session_keys::WISHLIST_OWNER, owner)
        .await?;
    tracing::debug!(%owner, "Created wishlist owner");
    Ok(owner)
}

// =============================================================================
// Handlers
// =============================================================================

/// Wishlist page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<WishlistTemplate> {
    let view = match get_owner(&session).await? {
        Some(owner) => WishlistView::observe(state.wishlists(), &owner).await,
        None => WishlistView::Empty,
    };

    Ok(WishlistTemplate::new(
        &view,
        state.config().catalog_path.as_str(),
    ))
}

/// Save an item.
#[instrument(skip(state, session, form), fields(product_id = %form.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToWishlistForm>,
) -> Result<Redirect> {
    let item = form.into_item()?;
    let owner = get_or_create_owner(&session).await?;

    let product_id = item.id.to_string();
    if state.wishlists().add(&owner, item).await {
        add_breadcrumb(
            "wishlist",
            "Added item",
            Some(&[("product_id", product_id.as_str())]),
        );
    }

    Ok(Redirect::to(WISHLIST_PATH))
}

/// Remove an item.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    if let Some(owner) = get_owner(&session).await?
        && WishlistView::remove(state.wishlists(), &owner, &id).await
    {
        add_breadcrumb(
            "wishlist",
            "Removed item",
            Some(&[("product_id", id.as_str())]),
        );
    }

    Ok(Redirect::to(WISHLIST_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(price: &str, image_url: Option<&str>) -> AddToWishlistForm {
        AddToWishlistForm {
            id: "p-9".to_string(),
            name: " Vase ".to_string(),
            category: "Decor".to_string(),
            price: price.to_string(),
            image_url: image_url.map(String::from),
        }
    }

    #[test]
    fn test_form_into_item() {
        let item = form("12.5", Some("https://cdn.test/vase.png")).into_item().unwrap();
        assert_eq!(item.id, ProductId::new("p-9"));
        assert_eq!(item.name, "Vase");
        assert_eq!(item.price.display(), "$12.50");
        assert_eq!(item.images.len(), 1);

        let item = form("12.5", Some("  ")).into_item().unwrap();
        assert!(item.images.is_empty());
    }

    #[test]
    fn test_form_rejects_bad_price() {
        assert!(matches!(
            form("-3", None).into_item(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            form("cheap", None).into_item(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_empty_state_renders_call_to_action() {
        let html = WishlistTemplate::new(&WishlistView::Empty, "/products")
            .render()
            .unwrap();
        assert!(html.contains("Your wishlist is empty"));
        assert!(html.contains("Browse Products"));
        assert!(html.contains("href=\"/products\""));
    }

    #[test]
    fn test_items_render_with_remove_control() {
        let card = WishlistCard {
            id: "p-9".to_string(),
            path_id: "p-9".to_string(),
            name: "Vase".to_string(),
            category: "Decor".to_string(),
            price: "$12.50".to_string(),
            image_url: None,
            image_alt: "Vase".to_string(),
        };
        let html = WishlistTemplate::new(&WishlistView::Items(vec![card]), "/products")
            .render()
            .unwrap();

        assert!(html.contains("Vase"));
        assert!(html.contains("Decor"));
        assert!(html.contains("$12.50"));
        assert!(html.contains("/wishlist/p-9/remove"));
        assert!(!html.contains("Your wishlist is empty"));
    }
}
