//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::FrontendConfig;
use crate::listing::{ProductListController, UserListController};
use crate::selection::SelectionContext;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The frontend serves a single
/// operator, so one selection and one pair of list controllers live for the
/// whole process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FrontendConfig,
    api: Arc<ApiClient>,
    selection: SelectionContext,
    users: UserListController<ApiClient>,
    products: Arc<ProductListController<ApiClient>>,
}

impl AppState {
    /// Create a new application state talking to the configured backend.
    #[must_use]
    pub fn new(config: FrontendConfig) -> Self {
        let api = Arc::new(ApiClient::new(config.endpoints.clone()));
        let selection = SelectionContext::new();
        let users = UserListController::new(Arc::clone(&api), selection.clone());
        let products = Arc::new(ProductListController::new(
            Arc::clone(&api),
            selection.clone(),
        ));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                selection,
                users,
                products,
            }),
        }
    }

    /// Get a reference to the frontend configuration.
    #[must_use]
    pub fn config(&self) -> &FrontendConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get the selection context.
    #[must_use]
    pub fn selection(&self) -> &SelectionContext {
        &self.inner.selection
    }

    /// Get the user list controller.
    #[must_use]
    pub fn users(&self) -> &UserListController<ApiClient> {
        &self.inner.users
    }

    /// Get the product list controller.
    #[must_use]
    pub fn products(&self) -> &Arc<ProductListController<ApiClient>> {
        &self.inner.products
    }
}
