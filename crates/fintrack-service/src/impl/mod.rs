//! Transaction service implementations.
//!
//! Trait definitions live in the parent module (`transaction_service.rs`).

pub mod transaction_service_impl;

pub use transaction_service_impl::{TransactionCacheService, TransactionCacheServiceParameters};
