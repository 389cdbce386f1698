//! User list controller.

use std::sync::Arc;

use catalogix_core::{NewUser, User, UserId};
use tracing::{error, info, instrument};

use crate::api::CatalogBackend;
use crate::selection::SelectionContext;

use super::{Alert, Confirmation, DeleteOutcome, FetchOutcome, ListState, ResourceList};

const FETCH_FAILED: &str = "Failed to fetch users.";
const REGISTER_FAILED: &str = "Failed to register user.";
const DELETE_FAILED: &str = "Failed to delete user.";

/// All users known to the backend.
///
/// The list has no dependency key; it is fetched whenever the user view is
/// shown and after every registration or deletion.
#[derive(Debug)]
pub struct UserListController<B> {
    backend: Arc<B>,
    selection: SelectionContext,
    list: ResourceList<User>,
}

impl<B: CatalogBackend> UserListController<B> {
    /// Create a controller. `selection` is cleared when its user is deleted.
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
    pub fn snapshot(&self) -> ListState<User> {
        self.list.snapshot()
    }

    /// Run one fetch cycle.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> FetchOutcome {
        let backend = &self.backend;
        self.list
            .run(|| Some(()), |()| backend.list_users())
            .await
    }

    /// Find a user by id, re-fetching if the loaded list does not have it.
    pub async fn find(&self, id: UserId) -> Option<User> {
        let lookup = |state: &ListState<User>| {
            state
                .items()
                .and_then(|users| users.iter().find(|u| u.id == id).cloned())
        };

        if let Some(user) = lookup(&self.snapshot()) {
            return Some(user);
        }
        self.refresh().await;
        lookup(&self.snapshot())
    }

    /// Register a user, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns an [`Alert`] if the backend rejects the registration.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &NewUser) -> Result<User, Alert> {
        let created = self.backend.register_user(user).await.map_err(|e| {
            error!(error = %e, "Error registering user");
            Alert(REGISTER_FAILED)
        })?;

        info!(user_id = %created.id, "User registered");
        self.refresh().await;
        Ok(created)
    }

    /// Delete a user once confirmed, then re-fetch.
    ///
    /// Deleting the selected user clears the selection.
    ///
    /// # Errors
    ///
    /// Returns an [`Alert`] if the backend rejects the delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId, confirmation: Confirmation) -> Result<DeleteOutcome, Alert> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.backend.delete_user(id).await.map_err(|e| {
            error!(error = %e, "Error deleting user");
            Alert(DELETE_FAILED)
        })?;

        info!(user_id = %id, "User deleted");
        if self.selection.clear_if(id) {
            info!(user_id = %id, "Cleared selection of deleted user");
        }
        self.refresh().await;
        Ok(DeleteOutcome::Deleted)
    }
}
