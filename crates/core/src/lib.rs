//! Catalogix Core - Shared domain types.
//!
//! This crate provides the types shared by the Catalogix components:
//! - `frontend` - Server-rendered catalog frontend
//! - `cli` - Command-line companion for the catalog backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. Request
//! payloads validate themselves with the same rules the backend enforces so
//! invalid input never leaves the process.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, users, products, prices, emails and list bodies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
