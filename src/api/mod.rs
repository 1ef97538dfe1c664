//! Axum HTTP handlers.

pub mod query;
