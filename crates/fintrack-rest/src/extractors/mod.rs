//! Custom Axum extractors.

mod query;
mod user;
mod validated;

pub use query::*;
pub use user::*;
pub use validated::*;
