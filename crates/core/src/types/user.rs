//! Catalog users.
//!
//! A [`User`] is only an identity for scoping product operations. Selecting
//! one in the frontend is not authentication.

use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::{Email, EmailError, UserId};

/// A user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Validation errors for [`NewUser`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    #[error("Name is required")]
    MissingName,
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("Password is required")]
    MissingPassword,
}

/// Registration payload for `POST /users/register`.
///
/// The password is kept as a secret and only exposed while serializing the
/// request body.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

impl NewUser {
    /// Build a registration payload from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`UserInputError`] if the name is blank, the email is
    /// malformed, or the password is empty.
    pub fn parse(name: &str, email: &str, password: String) -> Result<Self, UserInputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserInputError::MissingName);
        }

        let email = Email::parse(email)?;

        if password.is_empty() {
            return Err(UserInputError::MissingPassword);
        }

        Ok(Self {
            name: name.to_owned(),
            email,
            password: SecretString::from(password),
        })
    }
}

impl Serialize for NewUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NewUser", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("password", self.password.expose_secret())?;
        state.end()
    }
}
