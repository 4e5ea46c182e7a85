//! # Fintrack Repository
//!
//! The system of record for transactions, behind the
//! [`TransactionQueryEngine`] trait:
//!
//! ```text
//! TransactionCacheService
//!   ↓  Arc<dyn TransactionQueryEngine>
//! MySqlTransactionQueryEngine      InMemoryTransactionQueryEngine
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryTransactionQueryEngine;
pub use mysql::MySqlTransactionQueryEngine;
pub use pool::*;
pub use traits::*;
