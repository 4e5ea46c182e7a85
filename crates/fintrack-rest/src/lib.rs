//! # Fintrack REST
//!
//! REST API layer using Axum for Fintrack.
//! Provides the transaction endpoints, health probes and Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
