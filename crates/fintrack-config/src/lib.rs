//! # Fintrack Config
//!
//! Layered configuration for Fintrack: TOML files, `FINTRACK__` environment
//! variables and the single-variable overrides (`PORT`, `DATABASE_URL`,
//! `REDIS_URL`) used by existing deployments.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
