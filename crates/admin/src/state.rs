//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use moka::notification::RemovalCause;
use tokio::sync::Mutex;

use kestrel_core::UserId;

use crate::catalog::{CatalogApiError, CatalogClient, CatalogView};
use crate::config::AdminConfig;
use crate::models::CurrentUser;

/// A user's catalog view, locked while an operation mutates it.
pub type SharedCatalogView = Arc<Mutex<CatalogView>>;

/// Upper bound on concurrently cached catalog views.
const MAX_CATALOG_VIEWS: u64 = 10_000;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    catalog: CatalogClient,
    views: Cache<UserId, SharedCatalogView>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the product API client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, CatalogApiError> {
        let catalog = CatalogClient::new(&config.catalog_api)?;

        let views = Cache::builder()
            .max_capacity(MAX_CATALOG_VIEWS)
            .time_to_idle(config.view_idle)
            .eviction_listener(
                |user: Arc<UserId>, view: SharedCatalogView, cause: RemovalCause| {
                    // A handler holding the lock is about to drop its last
                    // reference anyway; its loads are already settled.
                    if let Ok(mut view) = view.try_lock() {
                        view.teardown();
                    }
                    tracing::debug!(user_id = %user, ?cause, "Catalog view dropped");
                },
            )
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                views,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the product API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get the catalog view for `user`, mounting a fresh one if needed.
    ///
    /// A cached view follows the user's current role.
    pub async fn catalog_view(&self, user: &CurrentUser) -> SharedCatalogView {
        let role = user.role;
        let view = self
            .inner
            .views
            .get_with(user.id.clone(), async move {
                tracing::debug!(%role, "Mounting catalog view");
                Arc::new(Mutex::new(CatalogView::new(role)))
            })
            .await;

        view.lock().await.set_role(role);
        view
    }

    /// Drop the catalog view for `user_id`, if one is mounted.
    pub async fn unmount_catalog_view(&self, user_id: &UserId) {
        self.inner.views.invalidate(user_id).await;
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("catalog", &self.inner.catalog)
            .field("mounted_views", &self.inner.views.entry_count())
            .finish()
    }
}
