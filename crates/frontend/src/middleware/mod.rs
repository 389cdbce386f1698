//! HTTP middleware stack for the frontend.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (per-request hub, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Selected user (tag the request's Sentry scope)

pub mod selected_user;

pub use selected_user::selected_user_middleware;
