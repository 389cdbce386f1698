//! Integration tests for Catalogix.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalogix-integration-tests
//! ```
//!
//! No external services are needed: [`MockBackend`] stands in for the catalog
//! backend and [`TestContext`] runs the frontend against it, both on
//! ephemeral local ports.
//!
//! # Test Categories
//!
//! - `api_client` - API client against the mock backend
//! - `frontend` - Rendered pages and form flows end to end

mod mock;

use std::time::Duration;

use catalogix_frontend::api::{ApiClient, ApiEndpoints};
use catalogix_frontend::config::FrontendConfig;
use catalogix_frontend::state::AppState;
use reqwest::{Client, StatusCode};
use url::Url;

pub use mock::{MockBackend, RecordedRequest};

/// A running frontend wired to a running mock backend.
pub struct TestContext {
    pub client: Client,
    pub backend: MockBackend,
    pub backend_url: Url,
    pub frontend_url: String,
    pub state: AppState,
}

impl TestContext {
    /// Start a mock backend and a frontend pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if a local port cannot be bound.
    pub async fn new() -> Self {
        Self::with_backend(MockBackend::new()).await
    }

    /// Like [`TestContext::new`], with a pre-seeded backend.
    ///
    /// # Panics
    ///
    /// Panics if a local port cannot be bound.
    pub async fn with_backend(backend: MockBackend) -> Self {
        let backend_url = backend.spawn().await.expect("Failed to start mock backend");

        let base = backend_url.to_string();
        let config = FrontendConfig::from_lookup(|key| {
            (key == "CATALOGIX_API_BASE_URL").then(|| base.clone())
        })
        .expect("Invalid test configuration");

        let state = AppState::new(config);
        state.products().spawn_key_watcher();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind frontend");
        let frontend_url = format!(
            "http://{}",
            listener.local_addr().expect("Listener has no address")
        );
        let app = catalogix_frontend::app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            client: Client::new(),
            backend,
            backend_url,
            frontend_url,
            state,
        }
    }

    /// An API client talking straight to the mock backend.
    #[must_use]
    pub fn api(&self) -> ApiClient {
        ApiClient::new(ApiEndpoints::same_origin(self.backend_url.clone()))
    }

    /// Absolute frontend URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.frontend_url)
    }

    /// GET a frontend page, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the frontend cannot be reached.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        read(response).await
    }

    /// POST a form to the frontend, following the redirect.
    ///
    /// # Panics
    ///
    /// Panics if the frontend cannot be reached.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed");
        read(response).await
    }

    /// Poll `condition` until it holds or two seconds pass.
    pub async fn eventually(&self, mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        condition()
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.expect("Unreadable body");
    (status, body)
}
