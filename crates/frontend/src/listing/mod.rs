//! Resource list controllers.
//!
//! Each controller owns a [`ResourceList`] (state slot + generation counter)
//! and drives it from the catalog backend:
//!
//! - [`ProductListController`] - products of the selected user, re-fetched
//!   whenever the selection key changes
//! - [`UserListController`] - all users, plus registration and deletion
//!
//! Mutations never patch the list in place; a successful create or delete
//! re-runs the fetch cycle. A failed mutation leaves the list untouched and
//! yields an [`Alert`] for the view to display.

mod products;
mod resource;
mod state;
mod users;

pub use products::ProductListController;
pub use resource::{FetchOutcome, ResourceList, Ticket};
pub use state::{Generation, ListEvent, ListState, reduce};
pub use users::UserListController;

/// A blocking, user-facing failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Alert(pub &'static str);

/// Answer to a "Delete this ...?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

impl Confirmation {
    /// Interpret a submitted confirm field. Only an explicit yes accepts.
    #[must_use]
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true") => {
                Self::Accepted
            }
            _ => Self::Declined,
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The backend deleted the item and the list was re-fetched.
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}
