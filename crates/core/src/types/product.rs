//! Catalog products.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Price, ProductId};

/// A product as returned by the backend.
///
/// Products are scoped to the user that created them; the scoping lives on
/// the server and is not modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validation errors for [`NewProduct`].
///
/// Messages mirror the backend's own validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductInputError {
    #[error("Product name is required")]
    MissingName,
    #[error("Price must be a number")]
    InvalidPrice,
    #[error("Price must be positive")]
    NonPositivePrice,
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewProduct {
    /// Build a product payload from raw form input.
    ///
    /// Blank descriptions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ProductInputError`] if the name is blank or the price is not
    /// a strictly positive number.
    pub fn parse(
        name: &str,
        price: &str,
        description: Option<&str>,
    ) -> Result<Self, ProductInputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductInputError::MissingName);
        }

        let price: Price = price
            .parse()
            .map_err(|_| ProductInputError::InvalidPrice)?;
        if !price.is_positive() {
            return Err(ProductInputError::NonPositivePrice);
        }

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        Ok(Self {
            name: name.to_owned(),
            price,
            description,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_backend_shape() {
        let product: Product =
            serde_json::from_str(r#"{"id":9,"name":"Pen","price":10}"#).unwrap();
        assert_eq!(product.id, ProductId::new(9));
        assert_eq!(product.name, "Pen");
        assert_eq!(product.price.to_string(), "10");
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_product_ignores_unknown_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"name":"Ink","price":2.5,"description":"blue","userId":3}"#,
        )
        .unwrap();
        assert_eq!(product.description.as_deref(), Some("blue"));
    }

    #[test]
    fn test_new_product_trims_and_drops_blank_description() {
        let product = NewProduct::parse("  Pen ", "10", Some("   ")).unwrap();
        assert_eq!(product.name, "Pen");
        assert_eq!(product.description, None);
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            serde_json::json!({"name": "Pen", "price": 10.0})
        );
    }

    #[test]
    fn test_new_product_rejects_blank_name() {
        assert_eq!(
            NewProduct::parse(" ", "10", None),
            Err(ProductInputError::MissingName)
        );
    }

    #[test]
    fn test_new_product_rejects_bad_prices() {
        assert_eq!(
            NewProduct::parse("Pen", "ten", None),
            Err(ProductInputError::InvalidPrice)
        );
        assert_eq!(
            NewProduct::parse("Pen", "0", None),
            Err(ProductInputError::NonPositivePrice)
        );
        assert_eq!(
            NewProduct::parse("Pen", "-1.5", None),
            Err(ProductInputError::NonPositivePrice)
        );
    }
}
