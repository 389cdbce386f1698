//! Welcome page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::ShellView;
use crate::state::AppState;

/// Welcome page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: ShellView,
}

/// Display the welcome page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        shell: ShellView::from_state(&state),
    }
}
