//! Decoded bodies of list endpoints.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The body of a list endpoint.
///
/// The backend is expected to answer with a JSON array, but anything else
/// (an error envelope, `null`, an empty body) is tolerated and treated as an
/// empty collection. A JSON array whose elements do not decode is still an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum ListBody<T> {
    /// A JSON array of items.
    Items(Vec<T>),
    /// Any non-array JSON value.
    Other(Value),
}

impl<T: DeserializeOwned> ListBody<T> {
    /// Classify an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is an array whose elements are not `T`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => serde_json::from_value(value).map(Self::Items),
            other => Ok(Self::Other(other)),
        }
    }
}

impl<T> ListBody<T> {
    /// Whether the body was list-shaped.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::Items(_))
    }

    /// The items, coercing a non-list body to an empty list.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Items(items) => items,
            Self::Other(_) => Vec::new(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListBody<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}
