//! Product route handlers, scoped to the selected user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use catalogix_core::{NewProduct, Product, ProductId};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{ConfirmForm, ConfirmTemplate, ListView, ShellView};
use crate::error::{AppError, Result};
use crate::listing::{Confirmation, FetchOutcome};
use crate::state::AppState;

/// Fetch cycles a page visit runs at most while newer fetches keep
/// superseding its own.
const MOUNT_ATTEMPTS: usize = 3;

/// Product display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    /// Price with currency symbol, e.g. `₹10`.
    pub price: String,
    pub description: String,
}

impl ProductView {
    fn new(product: Product, currency_symbol: &str) -> Self {
        Self {
            id: product.id,
            price: product.price.display_with(currency_symbol),
            description: product.description.unwrap_or_default(),
            name: product.name,
        }
    }
}

/// Product form values echoed back after a failed submit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shell: ShellView,
    pub products: ListView<ProductView>,
    pub alert: Option<String>,
    pub draft: ProductForm,
}

/// Display the selected user's products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    // A fetch started by the selection watcher can supersede this one; run
    // again so the page shows settled data rather than the loading notice.
    for _ in 0..MOUNT_ATTEMPTS {
        if state.products().refresh().await != FetchOutcome::Stale {
            break;
        }
    }
    index_page(&state, None, ProductForm::default())
}

/// Create a product from the form.
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn create(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Response {
    let product = match NewProduct::parse(&form.name, &form.price, Some(form.description.as_str())) {
        Ok(product) => product,
        Err(e) => {
            info!(error = %e, "Rejected product form");
            let page = index_page(&state, Some(e.to_string()), form);
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.products().create(&product).await {
        Ok(_) => Redirect::to("/products").into_response(),
        Err(alert) => index_page(&state, Some(alert.to_string()), form).into_response(),
    }
}

/// Ask for confirmation before deleting a product.
#[instrument(skip(state))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ConfirmTemplate> {
    let Some(product) = state.products().find(id).await else {
        return Err(match state.products().snapshot().error() {
            Some(message) => AppError::Unavailable(message),
            None => AppError::NotFound(format!("product {id}")),
        });
    };

    Ok(ConfirmTemplate {
        shell: ShellView::from_state(&state),
        prompt: "Delete this product?",
        subject: product.name,
        action: format!("/products/{id}/delete"),
        cancel: "/products",
    })
}

/// Delete a product once confirmed.
#[instrument(skip(state, form))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let confirmation = Confirmation::from_form(form.confirm.as_deref());
    match state.products().delete(id, confirmation).await {
        Ok(_) => Redirect::to("/products").into_response(),
        Err(alert) => {
            index_page(&state, Some(alert.to_string()), ProductForm::default()).into_response()
        }
    }
}

/// Render the product page from the current list state.
fn index_page(state: &AppState, alert: Option<String>, draft: ProductForm) -> ProductsIndexTemplate {
    let symbol = &state.config().currency_symbol;
    let products = ListView::from_state(state.products().snapshot(), |product| {
        ProductView::new(product, symbol)
    });

    ProductsIndexTemplate {
        shell: ShellView::from_state(state),
        products,
        alert,
        draft,
    }
}
