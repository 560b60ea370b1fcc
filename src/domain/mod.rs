pub mod card;
pub mod transaction;

pub use card::CardType;
pub use transaction::{Transaction, TransactionStatus};
