//! HTTP route handlers for the frontend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Welcome page
//!
//! # Users
//! GET  /users                  - User table and registration form
//! POST /users                  - Register a user
//! POST /users/{id}/select      - Select a user, redirect to /products
//! GET  /users/{id}/delete      - "Delete this user?" confirmation
//! POST /users/{id}/delete      - Delete once confirmed
//! POST /selection/clear        - Clear the selection
//!
//! # Products (scoped to the selected user)
//! GET  /products               - Product table and creation form
//! POST /products               - Create a product
//! GET  /products/{id}/delete   - "Delete this product?" confirmation
//! POST /products/{id}/delete   - Delete once confirmed
//! ```
//!
//! Successful form posts redirect (303) back to their page. Failures re-render
//! the page with an alert banner.

pub mod home;
pub mod products;
pub mod users;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};
use catalogix_core::User;
use serde::Deserialize;

use crate::listing::ListState;
use crate::state::AppState;

/// Layout data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct ShellView {
    /// Name of the selected user, shown as "Logged in as: ...".
    pub selected: Option<String>,
}

impl ShellView {
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self::from_selection(state.selection().current().as_ref())
    }

    #[must_use]
    pub fn from_selection(user: Option<&User>) -> Self {
        Self {
            selected: user.map(|u| u.name.clone()),
        }
    }
}

/// What a list section of a page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<T> {
    /// No user is selected.
    Prompt,
    Loading,
    Failed(&'static str),
    Empty,
    Rows(Vec<T>),
}

impl<T> ListView<T> {
    /// Map controller state to what the page renders.
    ///
    /// `Idle` only persists when nothing could be fetched, which for a keyed
    /// list means no user is selected.
    pub fn from_state<S>(state: ListState<S>, row: impl FnMut(S) -> T) -> Self {
        match state {
            ListState::Idle => Self::Prompt,
            ListState::Loading { .. } => Self::Loading,
            ListState::Error { message, .. } => Self::Failed(message),
            ListState::Loaded { items, .. } if items.is_empty() => Self::Empty,
            ListState::Loaded { items, .. } => Self::Rows(items.into_iter().map(row).collect()),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// "Delete this ...?" confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmTemplate {
    pub shell: ShellView,
    pub prompt: &'static str,
    /// Display name of the item being deleted.
    pub subject: String,
    /// Form target that performs the delete.
    pub action: String,
    /// Where "No" leads back to.
    pub cancel: &'static str,
}

/// Submitted "Delete this ...?" form.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::register))
        .route("/{id}/select", post(users::select))
        .route(
            "/{id}/delete",
            get(users::confirm_delete).post(users::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}/delete",
            get(products::confirm_delete).post(products::delete),
        )
}

/// Create all routes for the frontend.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/selection/clear", post(users::clear_selection))
        .nest("/users", user_routes())
        .nest("/products", product_routes())
}

#[cfg(test)]
mod tests {
    use catalogix_core::UserId;

    use super::*;

    #[test]
    fn test_list_view_from_state() {
        let view: ListView<u32> = ListView::from_state(ListState::<u32>::Idle, |n| n);
        assert_eq!(view, ListView::Prompt);

        let view = ListView::from_state(ListState::<u32>::Loading { generation: 1 }, |n| n);
        assert!(view.is_loading());

        let view = ListView::from_state(
            ListState::<u32>::Error {
                generation: 1,
                message: "Failed to fetch products.",
            },
            |n| n,
        );
        assert_eq!(view, ListView::Failed("Failed to fetch products."));

        let view = ListView::from_state(
            ListState::Loaded {
                generation: 2,
                items: Vec::<u32>::new(),
            },
            |n| n,
        );
        assert_eq!(view, ListView::Empty);

        let view = ListView::from_state(
            ListState::Loaded {
                generation: 3,
                items: vec![1_u32, 2],
            },
            |n| n * 10,
        );
        assert_eq!(view, ListView::Rows(vec![10, 20]));
    }

    #[test]
    fn test_shell_shows_selected_name() {
        let user = User {
            id: UserId::new(1),
            name: "Alice".to_string(),
            email: None,
        };
        assert_eq!(
            ShellView::from_selection(Some(&user)).selected.as_deref(),
            Some("Alice")
        );
        assert!(ShellView::from_selection(None).selected.is_none());
    }
}
