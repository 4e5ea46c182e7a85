//! MySQL implementations.

mod transaction_query_engine;

pub use transaction_query_engine::MySqlTransactionQueryEngine;
