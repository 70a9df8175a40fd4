//! Catalog route handlers.
//!
//! Each handler obtains the caller's [`CatalogView`], runs one view
//! operation and renders the page from the resulting state. Mutations
//! render straight from the updated local cache; only `index` fetches.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use kestrel_core::{Capability, Product, ProductId};

use crate::{
    catalog::{
        Alert, CatalogView, Confirmation, DeleteOutcome, LoadOutcome, ProductApi, ProductDraft,
        SubmitOutcome,
    },
    error::AppError,
    filters,
    middleware::RequireCatalogAccess,
    models::CurrentUser,
    state::AppState,
};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Delete confirmation form.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

/// Product row for templates.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    /// `id` percent-encoded for use as a URL path segment.
    pub path_id: String,
    pub name: String,
    pub price: String,
    pub stock: u32,
    pub description: String,
    pub image_url: Option<String>,
    pub image_alt: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let image = product.primary_image();
        Self {
            id: product.id.to_string(),
            path_id: urlencoding::encode(product.id.as_str()).into_owned(),
            name: product.name.clone(),
            price: product.price.display(),
            stock: product.stock,
            description: product.description.clone(),
            image_url: image.map(|img| img.url.clone()),
            image_alt: image
                .and_then(|img| img.alt.clone())
                .unwrap_or_else(|| product.name.clone()),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub user_name: String,
    pub role: String,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub products: Vec<ProductRow>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub draft: ProductDraft,
    pub editing: Option<String>,
    pub alert: Option<String>,
    pub notice: Option<String>,
}

impl ProductsIndexTemplate {
    fn new(user: &CurrentUser, view: &CatalogView) -> Self {
        let editing = view.edit_target().map(|id| {
            view.product(id)
                .map_or_else(|| id.to_string(), |p| p.name.clone())
        });

        Self {
            user_name: user.display_name().to_string(),
            role: view.role().to_string(),
            can_create: view.can(Capability::CreateProduct),
            can_edit: view.can(Capability::EditProduct),
            can_delete: view.can(Capability::DeleteProduct),
            products: view.products().iter().map(ProductRow::from).collect(),
            loading: view.is_loading(),
            error: view.error().map(String::from),
            search: view.search_term().to_string(),
            draft: view.draft().clone(),
            editing,
            alert: None,
            notice: None,
        }
    }

    fn with_alert(mut self, alert: Option<Alert>) -> Self {
        self.alert = alert.map(|a| a.message().to_string());
        self
    }

    fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "products/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub user_name: String,
    pub role: String,
    pub product: ProductRow,
}

/// Catalog page: mount the view (if needed) and load products.
///
/// The view lock is released while the request is in flight so a newer
/// search can be issued; the older response is then discarded as stale.
#[instrument(skip(user, state), fields(user_id = %user.id))]
pub async fn index(
    RequireCatalogAccess(user): RequireCatalogAccess,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ProductsIndexTemplate {
    let shared = state.catalog_view(&user).await;
    let term = query.search.unwrap_or_default();
    let term = term.trim();

    let ticket = shared.lock().await.begin_load(term);
    let result = state.catalog().list_products(term).await;

    let mut view = shared.lock().await;
    if view.finish_load(ticket, result) == LoadOutcome::Stale {
        tracing::debug!(search = %term, "Newer search superseded this request");
    }

    ProductsIndexTemplate::new(&user, &view)
}

/// Submit the product form.
#[instrument(skip(user, state, draft), fields(user_id = %user.id))]
pub async fn submit(
    RequireCatalogAccess(user): RequireCatalogAccess,
    State(state): State<AppState>,
    Form(draft): Form<ProductDraft>,
) -> ProductsIndexTemplate {
    let shared = state.catalog_view(&user).await;
    let mut view = shared.lock().await;

    view.replace_draft(draft);
    match view.submit_form(state.catalog()).await {
        Ok(SubmitOutcome::Created(id)) => {
            let name = view.product(&id).map(|p| p.name.clone()).unwrap_or_default();
            ProductsIndexTemplate::new(&user, &view).with_notice(format!("Added {name}"))
        }
        Ok(SubmitOutcome::Updated(id)) => {
            let name = view.product(&id).map(|p| p.name.clone()).unwrap_or_default();
            ProductsIndexTemplate::new(&user, &view).with_notice(format!("Saved {name}"))
        }
        Err(alert) => ProductsIndexTemplate::new(&user, &view).with_alert(Some(alert)),
    }
}

/// Enter edit mode for a product in the local cache.
#[instrument(skip(user, state), fields(user_id = %user.id))]
pub async fn edit(
    RequireCatalogAccess(user): RequireCatalogAccess,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductsIndexTemplate, AppError> {
    if !user.role.can(Capability::EditProduct) {
        return Err(AppError::Forbidden("Editing products is not allowed".to_string()));
    }

    let shared = state.catalog_view(&user).await;
    let mut view = shared.lock().await;

    let product = view
        .product(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    view.select_for_edit(&product);

    Ok(ProductsIndexTemplate::new(&user, &view))
}

/// Leave edit mode.
#[instrument(skip(user, state), fields(user_id = %user.id))]
pub async fn cancel_edit(
    RequireCatalogAccess(user): RequireCatalogAccess,
    State(state): State<AppState>,
) -> ProductsIndexTemplate {
    let shared = state.catalog_view(&user).await;
    let mut view = shared.lock().await;
    view.cancel_edit();

    ProductsIndexTemplate::new(&user, &view)
}

/// Ask the user to confirm a delete.
#[instrument(skip(user, state), fields(user_id = %user.id))]
pub async fn confirm_delete(
    RequireCatalogAccess(user): RequireCatalogAccess,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ConfirmDeleteTemplate, AppError> {
    if !user.role.can(Capability::DeleteProduct) {
        return Err(AppError::Forbidden("Only admins can delete products".to_string()));
    }

    let shared = state.catalog_view(&user).await;
    let view = shared.lock().await;
    let product = view
        .product(&id)
        .map(ProductRow::from)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ConfirmDeleteTemplate {
        user_name: user.display_name().to_string(),
        role: user.role.to_string(),
        product,
    })
}

/// Delete a product if the prompt was confirmed.
#[instrument(skip(user, state, form), fields(user_id = %user.id))]
pub async fn delete(
    RequireCatalogAccess(user): RequireCatalogAccess,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<DeleteForm>,
) -> ProductsIndexTemplate {
    let shared = state.catalog_view(&user).await;
    let mut view = shared.lock().await;

    let name = view.product(&id).map(|p| p.name.clone());
    let confirmation = Confirmation::from_form(form.confirm.as_deref());

    match view.delete_product(state.catalog(), &id, confirmation).await {
        Ok(DeleteOutcome::Deleted) => ProductsIndexTemplate::new(&user, &view)
            .with_notice(format!("Deleted {}", name.unwrap_or_else(|| id.to_string()))),
        Ok(DeleteOutcome::Cancelled) => ProductsIndexTemplate::new(&user, &view),
        Err(alert) => ProductsIndexTemplate::new(&user, &view).with_alert(Some(alert)),
    }
}
