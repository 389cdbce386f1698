//! Domain types for the catalog.

pub mod email;
pub mod id;
pub mod list;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use list::ListBody;
pub use price::Price;
pub use product::{NewProduct, Product, ProductInputError};
pub use user::{NewUser, User, UserInputError};
