//! HTTP implementation of [`CatalogBackend`].
//!
//! No retries and no timeouts: failures propagate to the caller as-is.

use catalogix_core::{ListBody, NewProduct, NewUser, Product, ProductId, User, UserId};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{
    Ack, ApiEndpoints, ApiError, CatalogBackend, ErrorEnvelope, IDENTITY_HEADER, require_identity,
};

/// Catalog backend client over reqwest.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: ApiEndpoints,
}

impl ApiClient {
    /// Create a new client for the given service endpoints.
    #[must_use]
    pub fn new(endpoints: ApiEndpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    /// Check that the user service answers `GET /users` successfully.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not a success.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.endpoints.users_url("users"))
            .send()
            .await?;
        check_status(response).await.map(drop)
    }

    fn scoped(&self, builder: RequestBuilder, identity: UserId) -> RequestBuilder {
        builder.header(IDENTITY_HEADER, identity.to_string())
    }
}

impl CatalogBackend for ApiClient {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<ListBody<User>, ApiError> {
        let response = self
            .client
            .get(self.endpoints.users_url("users"))
            .send()
            .await?;
        read_list(response).await
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn register_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.endpoints.users_url("users/register"))
            .json(user)
            .send()
            .await?;
        let created: User = read_json(response).await?;
        debug!(user_id = %created.id, "User registered");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<Ack, ApiError> {
        let response = self
            .client
            .delete(self.endpoints.users_url(&format!("users/{id}")))
            .send()
            .await?;
        let ack = read_ack(response).await?;
        debug!(status = %ack.status, body = %ack.body, "Deleted user response");
        Ok(ack)
    }

    #[instrument(skip(self))]
    async fn list_products(&self, identity: Option<UserId>) -> Result<ListBody<Product>, ApiError> {
        let identity = require_identity(identity)?;
        let request = self.client.get(self.endpoints.products_url("products"));
        let response = self.scoped(request, identity).send().await?;
        read_list(response).await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(
        &self,
        product: &NewProduct,
        identity: Option<UserId>,
    ) -> Result<Product, ApiError> {
        let identity = require_identity(identity)?;
        let request = self
            .client
            .post(self.endpoints.products_url("products"))
            .json(product);
        let response = self.scoped(request, identity).send().await?;
        let created: Product = read_json(response).await?;
        debug!(product_id = %created.id, "Product created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId, identity: Option<UserId>) -> Result<Ack, ApiError> {
        let identity = require_identity(identity)?;
        let request = self
            .client
            .delete(self.endpoints.products_url(&format!("products/{id}")));
        let response = self.scoped(request, identity).send().await?;
        let ack = read_ack(response).await?;
        debug!(status = %ack.status, body = %ack.body, "Deleted product response");
        Ok(ack)
    }
}

/// Turn a non-success response into [`ApiError::Status`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(ErrorEnvelope::summary)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()));

    warn!(status = %status, message = ?message, "Backend returned an error status");
    Err(ApiError::Status { status, message })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn read_list<T: DeserializeOwned>(response: Response) -> Result<ListBody<T>, ApiError> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    // Non-JSON text is kept as a string so it normalizes like any other
    // non-array body.
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body))
    };
    let list = ListBody::from_value(value)?;
    if !list.is_list() {
        debug!("List endpoint returned a non-array body");
    }
    Ok(list)
}

async fn read_ack(response: Response) -> Result<Ack, ApiError> {
    let response = check_status(response).await?;
    let status = response.status();
    let body = response.text().await?;
    Ok(Ack { status, body })
}
