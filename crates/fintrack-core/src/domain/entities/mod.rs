//! Domain entities.

mod category;
mod transaction;

pub use category::Category;
pub use transaction::{NewTransaction, Transaction, TransactionDetails};
