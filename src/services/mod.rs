pub mod fraud;
pub mod gateway;
pub mod ledger;

pub use fraud::FraudAssessment;
pub use gateway::GatewayClient;
pub use ledger::{Ledger, LedgerStats, StatusFilter};
