//! Product list controller.

use std::sync::Arc;

use catalogix_core::{NewProduct, Product, ProductId};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::api::CatalogBackend;
use crate::selection::SelectionContext;

use super::{Alert, Confirmation, DeleteOutcome, FetchOutcome, ListState, ResourceList};

const FETCH_FAILED: &str = "Failed to fetch products.";
const CREATE_FAILED: &str = "Failed to add product.";
const DELETE_FAILED: &str = "Failed to delete product.";

/// Products of the selected user.
///
/// The dependency key is the selected user's id. With no user selected the
/// controller performs no fetch and stays `Idle`.
#[derive(Debug)]
pub struct ProductListController<B> {
    backend: Arc<B>,
    selection: SelectionContext,
    list: ResourceList<Product>,
}

impl<B: CatalogBackend> ProductListController<B> {
    /// Create a controller reading its key from `selection`.
    #[must_use]
    pub const fn new(backend: Arc<B>, selection: SelectionContext) -> Self {
        Self {
            backend,
            selection,
            list: ResourceList::new(FETCH_FAILED),
        }
    }

    /// Current list state.
    #[must_use]
    pub fn snapshot(&self) -> ListState<Product> {
        self.list.snapshot()
    }

    /// Run one fetch cycle for the currently selected user.
    ///
    /// The key is read when the fetch is issued, so a selection made after
    /// this call supersedes it.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> FetchOutcome {
        let backend = &self.backend;
        self.list
            .run(
                || self.selection.current_id(),
                |identity| backend.list_products(Some(identity)),
            )
            .await
    }

    /// Find one of the selected user's products, re-fetching if the loaded
    /// list does not have it.
    pub async fn find(&self, id: ProductId) -> Option<Product> {
        let lookup = |state: &ListState<Product>| {
            state
                .items()
                .and_then(|products| products.iter().find(|p| p.id == id).cloned())
        };

        if let Some(product) = lookup(&self.snapshot()) {
            return Some(product);
        }
        self.refresh().await;
        lookup(&self.snapshot())
    }

    /// Create a product for the selected user, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns an [`Alert`] if the backend rejects the product or no user is
    /// selected. The list state is left unchanged.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct) -> Result<Product, Alert> {
        let identity = self.selection.current_id();
        let created = self
            .backend
            .create_product(product, identity)
            .await
            .map_err(|e| {
                error!(error = %e, "Error adding product");
                Alert(CREATE_FAILED)
            })?;

        info!(product_id = %created.id, "Product created");
        self.refresh().await;
        Ok(created)
    }

    /// Delete a product once the user has confirmed, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns an [`Alert`] if the backend rejects the delete or no user is
    /// selected.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        id: ProductId,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, Alert> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        let identity = self.selection.current_id();
        self.backend
            .delete_product(id, identity)
            .await
            .map_err(|e| {
                error!(error = %e, "Error deleting product");
                Alert(DELETE_FAILED)
            })?;

        info!(product_id = %id, "Product deleted");
        self.refresh().await;
        Ok(DeleteOutcome::Deleted)
    }
}

impl<B: CatalogBackend> ProductListController<B> {
    /// Spawn the task that re-fetches whenever the selection key changes.
    ///
    /// Each change starts its own fetch without cancelling the previous one;
    /// generation tagging discards whichever response is stale.
    pub fn spawn_key_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut keys = self.selection.subscribe();
        tokio::spawn(async move {
            while keys.changed().await.is_ok() {
                let key = keys.borrow_and_update().as_ref().map(|user| user.id);
                tracing::debug!(key = ?key, "Selection changed, re-fetching products");
                let fetch = Arc::clone(&controller);
                tokio::spawn(async move {
                    fetch.refresh().await;
                });
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use catalogix_core::{ListBody, NewUser, User, UserId};
    use tokio::sync::oneshot;

    use super::*;
    use crate::api::{Ack, ApiError};

    /// In-memory backend whose product listings can be held back per user.
    #[derive(Default)]
    struct FakeBackend {
        products: Mutex<HashMap<UserId, Vec<Product>>>,
        gates: Mutex<HashMap<UserId, oneshot::Receiver<()>>>,
        calls: AtomicUsize,
        fail_mutations: bool,
        next_id: AtomicUsize,
    }

    impl FakeBackend {
        fn with(self, user: i64, items: &[(i64, &str)]) -> Self {
            self.products.lock().unwrap().insert(
                UserId::new(user),
                items.iter().map(|(id, name)| product(*id, name)).collect(),
            );
            self.next_id.store(100, Ordering::SeqCst);
            self
        }

        fn hold(&self, user: i64) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(UserId::new(user), rx);
            tx
        }
    }

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: "10".parse().unwrap(),
            description: None,
        }
    }

    impl CatalogBackend for FakeBackend {
        async fn list_users(&self) -> Result<ListBody<User>, ApiError> {
            Ok(ListBody::Items(vec![]))
        }

        async fn register_user(&self, _user: &NewUser) -> Result<User, ApiError> {
            Err(ApiError::IdentityRequired)
        }

        async fn delete_user(&self, _id: UserId) -> Result<Ack, ApiError> {
            Err(ApiError::IdentityRequired)
        }

        async fn list_products(
            &self,
            identity: Option<UserId>,
        ) -> Result<ListBody<Product>, ApiError> {
            let identity = crate::api::require_identity(identity)?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap().remove(&identity);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let items = self
                .products
                .lock()
                .unwrap()
                .get(&identity)
                .cloned()
                .unwrap_or_default();
            Ok(ListBody::Items(items))
        }

        async fn create_product(
            &self,
            new: &NewProduct,
            identity: Option<UserId>,
        ) -> Result<Product, ApiError> {
            let identity = crate::api::require_identity(identity)?;
            if self.fail_mutations {
                return Err(ApiError::Status {
                    status: reqwest::StatusCode::BAD_REQUEST,
                    message: Some("Validation failed".to_string()),
                });
            }
            let id = i64::try_from(self.next_id.fetch_add(1, Ordering::SeqCst)).unwrap();
            let created = product(id, &new.name);
            self.products
                .lock()
                .unwrap()
                .entry(identity)
                .or_default()
                .push(created.clone());
            Ok(created)
        }

        async fn delete_product(
            &self,
            id: ProductId,
            identity: Option<UserId>,
        ) -> Result<Ack, ApiError> {
            let identity = crate::api::require_identity(identity)?;
            if self.fail_mutations {
                return Err(ApiError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    message: None,
                });
            }
            if let Some(items) = self.products.lock().unwrap().get_mut(&identity) {
                items.retain(|p| p.id != id);
            }
            Ok(Ack {
                status: reqwest::StatusCode::NO_CONTENT,
                body: String::new(),
            })
        }
    }

    fn user(id: i64, name: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: None,
        }
    }

    fn names(state: &ListState<Product>) -> Vec<String> {
        state
            .items()
            .unwrap_or_default()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn controller(backend: FakeBackend) -> (Arc<ProductListController<FakeBackend>>, SelectionContext) {
        let selection = SelectionContext::new();
        let controller = Arc::new(ProductListController::new(
            Arc::new(backend),
            selection.clone(),
        ));
        (controller, selection)
    }

    #[tokio::test]
    async fn test_no_selection_performs_no_fetch() {
        let (controller, _selection) = controller(FakeBackend::default());
        assert_eq!(controller.refresh().await, FetchOutcome::Skipped);
        assert_eq!(controller.snapshot(), ListState::Idle);
        assert_eq!(controller.backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_loads_selected_users_products() {
        let (controller, selection) =
            controller(FakeBackend::default().with(1, &[(9, "Pen")]));
        selection.select(user(1, "Alice"));

        assert_eq!(controller.refresh().await, FetchOutcome::Applied);
        assert_eq!(names(&controller.snapshot()), vec!["Pen"]);
    }

    #[tokio::test]
    async fn test_refresh_twice_is_idempotent() {
        let (controller, selection) =
            controller(FakeBackend::default().with(1, &[(9, "Pen"), (10, "Ink")]));
        selection.select(user(1, "Alice"));

        controller.refresh().await;
        let first = controller.snapshot().items().map(<[Product]>::to_vec);
        controller.refresh().await;
        let second = controller.snapshot().items().map(<[Product]>::to_vec);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_stale_response_for_previous_user_is_discarded() {
        let backend = FakeBackend::default()
            .with(1, &[(1, "Alice's pen")])
            .with(2, &[(2, "Bob's ink")]);
        let release_alice = backend.hold(1);
        let (controller, selection) = controller(backend);

        selection.select(user(1, "Alice"));
        let alice_fetch = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh().await }
        });
        // Let the held fetch for Alice get issued before switching.
        while controller.backend.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        selection.select(user(2, "Bob"));
        assert_eq!(controller.refresh().await, FetchOutcome::Applied);

        release_alice.send(()).unwrap();
        assert_eq!(alice_fetch.await.unwrap(), FetchOutcome::Stale);
        assert_eq!(names(&controller.snapshot()), vec!["Bob's ink"]);
    }

    #[tokio::test]
    async fn test_create_refetches() {
        let (controller, selection) =
            controller(FakeBackend::default().with(1, &[]));
        selection.select(user(1, "Alice"));
        controller.refresh().await;
        assert!(names(&controller.snapshot()).is_empty());

        let new = NewProduct::parse("Pen", "10", None).unwrap();
        controller.create(&new).await.unwrap();
        assert_eq!(names(&controller.snapshot()), vec!["Pen"]);
    }

    #[tokio::test]
    async fn test_find_only_sees_selected_users_products() {
        let (controller, selection) = controller(
            FakeBackend::default()
                .with(1, &[(9, "Pen")])
                .with(2, &[(3, "Ink")]),
        );
        selection.select(user(1, "Alice"));

        let found = controller.find(ProductId::new(9)).await;
        assert_eq!(found.map(|p| p.name), Some("Pen".to_string()));
        assert!(controller.find(ProductId::new(3)).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_create_alerts_and_keeps_list() {
        let mut backend = FakeBackend::default().with(1, &[(9, "Pen")]);
        backend.fail_mutations = true;
        let (controller, selection) = controller(backend);
        selection.select(user(1, "Alice"));
        controller.refresh().await;
        let before = controller.snapshot();

        let new = NewProduct::parse("Ink", "5", None).unwrap();
        assert_eq!(
            controller.create(&new).await.unwrap_err(),
            Alert("Failed to add product.")
        );
        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test]
    async fn test_create_without_selection_is_refused() {
        let (controller, _selection) = controller(FakeBackend::default());
        let new = NewProduct::parse("Pen", "10", None).unwrap();
        assert!(controller.create(&new).await.is_err());
        assert_eq!(controller.backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_declined_delete_is_a_no_op() {
        let (controller, selection) =
            controller(FakeBackend::default().with(1, &[(9, "Pen")]));
        selection.select(user(1, "Alice"));
        controller.refresh().await;

        let outcome = controller
            .delete(ProductId::new(9), Confirmation::Declined)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(names(&controller.snapshot()), vec!["Pen"]);
        assert_eq!(controller.backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_accepted_delete_refetches_to_empty() {
        let (controller, selection) =
            controller(FakeBackend::default().with(1, &[(9, "Pen")]));
        selection.select(user(1, "Alice"));
        controller.refresh().await;

        let outcome = controller
            .delete(ProductId::new(9), Confirmation::Accepted)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(controller.snapshot().items(), Some(&[][..]));
    }

    #[tokio::test]
    async fn test_failed_delete_alerts() {
        let mut backend = FakeBackend::default().with(1, &[(9, "Pen")]);
        backend.fail_mutations = true;
        let (controller, selection) = controller(backend);
        selection.select(user(1, "Alice"));

        assert_eq!(
            controller
                .delete(ProductId::new(9), Confirmation::Accepted)
                .await
                .unwrap_err(),
            Alert("Failed to delete product.")
        );
    }

    #[tokio::test]
    async fn test_key_watcher_fetches_on_selection_change() {
        let (controller, selection) =
            controller(FakeBackend::default().with(1, &[(9, "Pen")]).with(2, &[(3, "Ink")]));
        let watcher = controller.spawn_key_watcher();

        selection.select(user(1, "Alice"));
        selection.select(user(2, "Bob"));

        for _ in 0..1_000 {
            if names(&controller.snapshot()) == vec!["Ink"] {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(names(&controller.snapshot()), vec!["Ink"]);

        selection.clear();
        for _ in 0..1_000 {
            if controller.snapshot() == ListState::Idle {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.snapshot(), ListState::Idle);
        watcher.abort();
    }
}
