//! Catalog backend REST client.
//!
//! # Endpoints
//!
//! ```text
//! GET    /users               - List users
//! POST   /users/register      - Register a user
//! DELETE /users/{id}          - Delete a user
//! GET    /products            - List products      (X-USER-ID)
//! POST   /products            - Create a product   (X-USER-ID)
//! DELETE /products/{id}       - Delete a product   (X-USER-ID)
//! ```
//!
//! Product operations are scoped by the identity header. Calling one without
//! an identity fails with [`ApiError::IdentityRequired`] before any request is
//! built.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalogix_frontend::api::{ApiClient, ApiEndpoints, CatalogBackend};
//!
//! let client = ApiClient::new(ApiEndpoints::same_origin(base_url));
//! let users = client.list_users().await?.into_items();
//! let products = client.list_products(Some(users[0].id)).await?;
//! ```

mod client;

use std::future::Future;

use catalogix_core::{ListBody, NewProduct, NewUser, Product, ProductId, User, UserId};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub use client::ApiClient;

/// Header carrying the selected user's id on product operations.
pub const IDENTITY_HEADER: &str = "X-USER-ID";

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A product operation was attempted without a selected user.
    #[error("User ID is required")]
    IdentityRequired,

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error envelope produced by the backend's exception handlers.
///
/// Shape: `{"message": "...", "status": 409, "timestamp": "...", "errors": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorEnvelope {
    /// Flatten the envelope into one line, appending field errors if present.
    pub(crate) fn summary(self) -> Option<String> {
        match (self.message, self.errors.is_empty()) {
            (Some(message), true) => Some(message),
            (Some(message), false) => Some(format!("{message} ({})", self.errors.join("; "))),
            (None, false) => Some(self.errors.join("; ")),
            (None, true) => None,
        }
    }
}

/// Backend acknowledgement of a delete.
///
/// Callers discard it; it is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub status: StatusCode,
    pub body: String,
}

/// Base URLs of the user and product services.
///
/// Both services usually sit behind the same origin, but they can be pointed
/// at different hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub users: Url,
    pub products: Url,
}

impl ApiEndpoints {
    /// Both services behind one base URL.
    #[must_use]
    pub fn same_origin(base: Url) -> Self {
        Self {
            users: base.clone(),
            products: base,
        }
    }

    /// URL of a path under the user service, e.g. `users/register`.
    #[must_use]
    pub fn users_url(&self, path: &str) -> String {
        join(&self.users, path)
    }

    /// URL of a path under the product service, e.g. `products/9`.
    #[must_use]
    pub fn products_url(&self, path: &str) -> String {
        join(&self.products, path)
    }
}

fn join(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Operations the catalog backend offers.
///
/// [`ApiClient`] is the HTTP implementation; controllers are generic over
/// this trait so they can be driven by an in-memory backend in tests.
pub trait CatalogBackend: Send + Sync + 'static {
    /// `GET /users`.
    fn list_users(&self) -> impl Future<Output = Result<ListBody<User>, ApiError>> + Send;

    /// `POST /users/register`.
    fn register_user(&self, user: &NewUser) -> impl Future<Output = Result<User, ApiError>> + Send;

    /// `DELETE /users/{id}`.
    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<Ack, ApiError>> + Send;

    /// `GET /products` scoped by `identity`.
    fn list_products(
        &self,
        identity: Option<UserId>,
    ) -> impl Future<Output = Result<ListBody<Product>, ApiError>> + Send;

    /// `POST /products` scoped by `identity`.
    fn create_product(
        &self,
        product: &NewProduct,
        identity: Option<UserId>,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// `DELETE /products/{id}` scoped by `identity`.
    fn delete_product(
        &self,
        id: ProductId,
        identity: Option<UserId>,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;
}

/// Resolve the identity header value, refusing when no user is selected.
///
/// # Errors
///
/// Returns [`ApiError::IdentityRequired`] if `identity` is `None`.
pub fn require_identity(identity: Option<UserId>) -> Result<UserId, ApiError> {
    identity.ok_or(ApiError::IdentityRequired)
}
