//! # vault-api
//!
//! HTTP API layer for Vault built on Axum.
//!
//! Provides the REST endpoints, the public share routes, extractors, DTOs,
//! middleware (CORS, compression, tracing), and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
