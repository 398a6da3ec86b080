//! Typed client for the CardSpace API.
//!
//! [`ApiClient`] owns the HTTP connection; per-resource services hang off
//! it (`client.users()`, `client.cards()`, `client.spaces()`).

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod render;
pub mod services;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::ClientError;
