//! # Fintrack Service
//!
//! Cache-aside service layer over the transaction query engine: cache
//! stores and key layout, the transaction service and its DTOs.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod metrics;
pub mod transaction_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use transaction_service::*;
