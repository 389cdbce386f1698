//! Sentry user context from the current selection.
//!
//! `NewSentryLayer` gives every request a fresh hub, so the selected user has
//! to be written into each request's scope rather than once on selection.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use catalogix_core::User;

use crate::state::AppState;

/// Set the Sentry user to the selected user, or clear it when nobody is
/// selected.
pub async fn selected_user_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match state.selection().current() {
        Some(user) => set_sentry_user(&user),
        None => clear_sentry_user(),
    }

    next.run(request).await
}

fn set_sentry_user(user: &User) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            username: Some(user.name.clone()),
            email: user.email.as_ref().map(ToString::to_string),
            ..Default::default()
        }));
    });
}

fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
