//! Domain entities and value objects for the transaction ledger.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
