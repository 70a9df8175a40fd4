//! Catalog view model.
//!
//! One [`CatalogView`] exists per signed-in user for as long as they keep
//! using the catalog page. It owns the local product cache, the form draft
//! and the edit target, and it is the only thing that mutates them.
//!
//! # Load ordering
//!
//! Every load is tagged with a sequence number from [`CatalogView::begin_load`].
//! [`CatalogView::finish_load`] only applies a response whose ticket is the
//! latest one issued, so a slow search can never overwrite a newer one.

use tracing::instrument;

use kestrel_core::{Capability, Product, ProductId, Role};

use super::api::{CatalogApiError, ProductApi};
use super::draft::{DraftField, ProductDraft};
use crate::models::CurrentUser;

/// Category assigned to products created from the catalog form.
pub const DEFAULT_CATEGORY: &str = "Other";

const FETCH_FAILED: &str = "Failed to fetch products";
const OPERATION_FAILED: &str = "Operation failed";
const DELETE_FAILED: &str = "Delete failed";

/// The caller may not open the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied;

/// Check that `user` holds a role allowed to open the catalog.
///
/// # Errors
///
/// Returns `AccessDenied` when nobody is signed in or the role lacks
/// [`Capability::ViewCatalog`].
pub fn authorize(user: Option<&CurrentUser>) -> Result<Role, AccessDenied> {
    match user {
        Some(user) if user.role.can(Capability::ViewCatalog) => Ok(user.role),
        _ => Err(AccessDenied),
    }
}

/// A blocking message shown after a failed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert(String);

impl Alert {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }

    fn from_api(err: &CatalogApiError, fallback: &str) -> Self {
        Self(err.user_message(fallback))
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle for one in-flight product load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    seq: u64,
}

/// What happened to a load response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The product cache was replaced.
    Applied,
    /// The load failed; the cache was kept and an error is shown.
    Failed,
    /// A newer load was issued after this one; the response was dropped.
    Stale,
}

/// Result of a successful form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(ProductId),
    Updated(ProductId),
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt; nothing was sent.
    Cancelled,
}

/// Answer to the delete confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Interpret the prompt's form value: only `yes` confirms.
    #[must_use]
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("yes") => Self::Confirmed,
            _ => Self::Declined,
        }
    }
}

/// State of one user's catalog administration page.
#[derive(Debug, Clone)]
pub struct CatalogView {
    role: Role,
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
    search: String,
    draft: ProductDraft,
    edit_target: Option<ProductId>,
    /// Sequence number of the most recently issued load.
    issued: u64,
}

impl CatalogView {
    /// A freshly mounted view. Nothing has been fetched yet.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            products: Vec::new(),
            loading: true,
            error: None,
            search: String::new(),
            draft: ProductDraft::default(),
            edit_target: None,
            issued: 0,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the current role grants `capability`.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Follow a change of the signed-in identity's role.
    pub fn set_role(&mut self, role: Role) {
        if self.role != role {
            tracing::info!(from = %self.role, to = %role, "Catalog view role changed");
            self.role = role;
        }
    }

    /// The local product cache, in the order the backend returned it.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a cached product.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The inline error from the latest failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The search term of the latest load.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    /// The product being edited, or `None` in create mode.
    #[must_use]
    pub const fn edit_target(&self) -> Option<&ProductId> {
        self.edit_target.as_ref()
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Start a load for `search`, superseding any load still in flight.
    pub fn begin_load(&mut self, search: &str) -> LoadTicket {
        self.issued = self.issued.wrapping_add(1);
        self.loading = true;
        self.error = None;
        search.clone_into(&mut self.search);
        LoadTicket { seq: self.issued }
    }

    /// Apply the response of the load identified by `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Product>, CatalogApiError>,
    ) -> LoadOutcome {
        if ticket.seq != self.issued {
            tracing::debug!(
                ticket = ticket.seq,
                latest = self.issued,
                "Discarding stale product load"
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(products) => {
                self.products = products;
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch products");
                self.error = Some(e.user_message(FETCH_FAILED));
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch products matching `search` and replace the cache on success.
    #[instrument(skip(self, api), fields(role = %self.role))]
    pub async fn load_products<A: ProductApi>(&mut self, api: &A, search: &str) -> LoadOutcome {
        let ticket = self.begin_load(search);
        let result = api.list_products(search).await;
        self.finish_load(ticket, result)
    }

    /// Search input changed: re-fetch immediately with the new term.
    pub async fn search<A: ProductApi>(&mut self, api: &A, term: &str) -> LoadOutcome {
        self.load_products(api, term).await
    }

    /// Drop interest in any in-flight load. Late responses become stale.
    pub fn teardown(&mut self) {
        self.invalidate_loads();
    }

    /// A load issued before a local mutation would overwrite it on arrival.
    fn invalidate_loads(&mut self) {
        self.issued = self.issued.wrapping_add(1);
        self.loading = false;
    }

    // =========================================================================
    // Form
    // =========================================================================

    /// Controlled-input update of one draft field.
    pub fn update_draft(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Replace the whole draft, e.g. with a submitted form.
    pub fn replace_draft(&mut self, draft: ProductDraft) {
        self.draft = draft;
    }

    /// Enter edit mode for `product`, mirroring its fields into the draft.
    pub fn select_for_edit(&mut self, product: &Product) {
        self.draft = ProductDraft::from_product(product);
        self.edit_target = Some(product.id.clone());
    }

    /// Leave edit mode and start over with an empty draft.
    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.draft = ProductDraft::default();
    }

    /// Save the draft: update the edit target, or create a new product.
    ///
    /// # Errors
    ///
    /// Returns an `Alert` if the draft is invalid, the role lacks the needed
    /// capability, or the backend rejects the request. State is unchanged.
    #[instrument(skip(self, api), fields(role = %self.role, edit_target = ?self.edit_target))]
    pub async fn submit_form<A: ProductApi>(&mut self, api: &A) -> Result<SubmitOutcome, Alert> {
        let parsed = self.draft.parse().map_err(|e| Alert::new(e.to_string()))?;

        if let Some(target) = self.edit_target.clone() {
            if !self.can(Capability::EditProduct) {
                return Err(Alert::new("You do not have permission to edit products"));
            }

            let updated = api
                .update_product(&target, &parsed.to_update())
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, product_id = %target, "Product update failed");
                    Alert::from_api(&e, OPERATION_FAILED)
                })?;

            let id = updated.id.clone();
            if let Some(slot) = self.products.iter_mut().find(|p| p.id == target) {
                *slot = updated;
            }
            self.edit_target = None;
            self.draft = ProductDraft::default();
            self.invalidate_loads();
            tracing::info!(product_id = %id, "Product updated");
            return Ok(SubmitOutcome::Updated(id));
        }

        if !self.can(Capability::CreateProduct) {
            return Err(Alert::new("You do not have permission to add products"));
        }

        let created = api
            .create_product(&parsed.to_new_product(DEFAULT_CATEGORY))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Product create failed");
                Alert::from_api(&e, OPERATION_FAILED)
            })?;

        let id = created.id.clone();
        self.products.retain(|p| p.id != id);
        self.products.insert(0, created);
        self.draft = ProductDraft::default();
        self.invalidate_loads();
        tracing::info!(product_id = %id, "Product created");
        Ok(SubmitOutcome::Created(id))
    }

    /// Delete a product after the user confirmed the prompt.
    ///
    /// # Errors
    ///
    /// Returns an `Alert` if the role may not delete or the backend rejects
    /// the request. The cache is unchanged in that case.
    #[instrument(skip(self, api), fields(role = %self.role))]
    pub async fn delete_product<A: ProductApi>(
        &mut self,
        api: &A,
        id: &ProductId,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, Alert> {
        if !self.can(Capability::DeleteProduct) {
            return Err(Alert::new("Only admins can delete products"));
        }
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        api.delete_product(id).await.map_err(|e| {
            tracing::warn!(error = %e, product_id = %id, "Product delete failed");
            Alert::from_api(&e, DELETE_FAILED)
        })?;

        self.products.retain(|p| &p.id != id);
        if self.edit_target.as_ref() == Some(id) {
            self.cancel_edit();
        }
        self.invalidate_loads();
        tracing::info!(product_id = %id, "Product deleted");
        Ok(DeleteOutcome::Deleted)
    }
}
