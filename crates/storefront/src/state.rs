//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::wishlist::InMemoryWishlists;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    wishlists: InMemoryWishlists,
}

impl AppState {
    /// Create a new application state with empty wishlists.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                wishlists: InMemoryWishlists::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the wishlist provider.
    #[must_use]
    pub fn wishlists(&self) -> &InMemoryWishlists {
        &self.inner.wishlists
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
