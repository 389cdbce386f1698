//! User route handlers: listing, registration, selection and deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use catalogix_core::{NewUser, User, UserId};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{ConfirmForm, ConfirmTemplate, ListView, ShellView};
use crate::error::{AppError, Result};
use crate::listing::Confirmation;
use crate::state::AppState;

/// User display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub selected: bool,
}

/// Registration form values echoed back after a failed submit.
#[derive(Debug, Clone, Default)]
pub struct RegisterDraft {
    pub name: String,
    pub email: String,
}

/// Submitted registration form.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub shell: ShellView,
    pub users: ListView<UserRow>,
    pub alert: Option<String>,
    pub draft: RegisterDraft,
}

/// Display the user table.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    state.users().refresh().await;
    index_page(&state, None, RegisterDraft::default()).await
}

/// Register a user from the form.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let draft = RegisterDraft {
        name: form.name.clone(),
        email: form.email.clone(),
    };

    let new_user = match NewUser::parse(&form.name, &form.email, form.password) {
        Ok(user) => user,
        Err(e) => {
            info!(error = %e, "Rejected registration form");
            let page = index_page(&state, Some(e.to_string()), draft).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.users().register(&new_user).await {
        Ok(_) => Redirect::to("/users").into_response(),
        Err(alert) => index_page(&state, Some(alert.to_string()), draft)
            .await
            .into_response(),
    }
}

/// Select a user as the active identity.
#[instrument(skip(state))]
pub async fn select(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Redirect> {
    let user = find_user(&state, id).await?;

    info!(user_id = %user.id, "User selected");
    state.selection().select(user);
    Ok(Redirect::to("/products"))
}

/// Clear the active identity.
#[instrument(skip(state))]
pub async fn clear_selection(State(state): State<AppState>) -> Redirect {
    if state.selection().clear() {
        info!("Selection cleared");
    }
    Redirect::to("/users")
}

/// Ask for confirmation before deleting a user.
#[instrument(skip(state))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<ConfirmTemplate> {
    let user = find_user(&state, id).await?;

    Ok(ConfirmTemplate {
        shell: ShellView::from_state(&state),
        prompt: "Delete this user?",
        subject: user.name,
        action: format!("/users/{id}/delete"),
        cancel: "/users",
    })
}

/// Delete a user once confirmed.
#[instrument(skip(state, form))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let confirmation = Confirmation::from_form(form.confirm.as_deref());
    match state.users().delete(id, confirmation).await {
        Ok(_) => Redirect::to("/users").into_response(),
        Err(alert) => index_page(&state, Some(alert.to_string()), RegisterDraft::default())
            .await
            .into_response(),
    }
}

async fn find_user(state: &AppState, id: UserId) -> Result<User> {
    match state.users().find(id).await {
        Some(user) => Ok(user),
        None => Err(match state.users().snapshot().error() {
            Some(message) => AppError::Unavailable(message),
            None => AppError::NotFound(format!("user {id}")),
        }),
    }
}

/// Render the user page from the current list state.
///
/// Fetches first if the list was never loaded.
async fn index_page(state: &AppState, alert: Option<String>, draft: RegisterDraft) -> UsersIndexTemplate {
    let mut snapshot = state.users().snapshot();
    if snapshot.generation().is_none() {
        state.users().refresh().await;
        snapshot = state.users().snapshot();
    }

    let selected = state.selection().current_id();
    let users = match ListView::from_state(snapshot, |user| user_row(user, selected)) {
        ListView::Prompt => ListView::Empty,
        view => view,
    };

    UsersIndexTemplate {
        shell: ShellView::from_state(state),
        users,
        alert,
        draft,
    }
}

fn user_row(user: User, selected: Option<UserId>) -> UserRow {
    UserRow {
        id: user.id,
        selected: selected == Some(user.id),
        email: user.email.map(|e| e.to_string()).unwrap_or_default(),
        name: user.name,
    }
}
