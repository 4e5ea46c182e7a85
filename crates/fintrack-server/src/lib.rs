//! # Fintrack Server Library
//!
//! Dependency wiring, observability setup and startup helpers for the
//! Fintrack server binary.

pub mod di;
pub mod observability;
pub mod startup;
