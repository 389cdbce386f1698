//! The currently selected user.
//!
//! Selecting a user is not authentication; it only decides which identity
//! header product operations carry. The context is handed to whoever needs it
//! through [`crate::state::AppState`] and publishes key changes on a watch
//! channel so the product list can re-fetch.

use std::sync::Arc;

use catalogix_core::{User, UserId};
use tokio::sync::watch;

/// Shared holder of at most one selected [`User`].
///
/// Cheaply cloneable; all clones observe the same selection.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    tx: Arc<watch::Sender<Option<User>>>,
}

impl Default for SelectionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionContext {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The selected user, if any.
    #[must_use]
    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    /// Id of the selected user, i.e. the dependency key and identity header.
    #[must_use]
    pub fn current_id(&self) -> Option<UserId> {
        self.tx.borrow().as_ref().map(|user| user.id)
    }

    /// Select `user`.
    ///
    /// Returns `true` if the dependency key changed. Re-selecting the same id
    /// refreshes the stored record without notifying subscribers.
    pub fn select(&self, user: User) -> bool {
        self.tx.send_if_modified(|slot| {
            let changed = slot.as_ref().map(|u| u.id) != Some(user.id);
            *slot = Some(user);
            changed
        })
    }

    /// Clear the selection. Returns `true` if a user was selected.
    pub fn clear(&self) -> bool {
        self.tx.send_if_modified(|slot| slot.take().is_some())
    }

    /// Clear the selection only if `id` is the selected user.
    pub fn clear_if(&self, id: UserId) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.as_ref().is_some_and(|u| u.id == id) {
                *slot = None;
                true
            } else {
                false
            }
        })
    }

    /// Subscribe to dependency key changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_starts_empty() {
        let selection = SelectionContext::new();
        assert!(selection.current().is_none());
        assert!(selection.current_id().is_none());
    }

    #[test]
    fn test_select_reports_key_changes() {
        let selection = SelectionContext::new();
        assert!(selection.select(user(1, "Alice")));
        assert!(!selection.select(user(1, "Alice Smith")));
        assert_eq!(
            selection.current().map(|u| u.name),
            Some("Alice Smith".to_string())
        );
        assert!(selection.select(user(2, "Bob")));
        assert_eq!(selection.current_id(), Some(UserId::new(2)));
    }

    #[test]
    fn test_clear() {
        let selection = SelectionContext::new();
        assert!(!selection.clear());
        selection.select(user(1, "Alice"));
        assert!(selection.clear());
        assert!(selection.current().is_none());
    }

    #[test]
    fn test_clear_if_only_matches_selected_user() {
        let selection = SelectionContext::new();
        selection.select(user(1, "Alice"));
        assert!(!selection.clear_if(UserId::new(2)));
        assert!(selection.clear_if(UserId::new(1)));
        assert!(selection.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_key_changes_only() {
        let selection = SelectionContext::new();
        let clone = selection.clone();
        let mut rx = selection.subscribe();

        clone.select(user(1, "Alice"));
        assert!(rx.has_changed().unwrap_or(false));
        rx.borrow_and_update();

        clone.select(user(1, "Alice"));
        assert!(!rx.has_changed().unwrap_or(true));
    }
}
