//! Transaction domain entity.
//! Framework-agnostic representation of a recorded payment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::card::{self, CardType};

/// Authorization outcome, supplied by the gateway. Historical entries with a
/// missing or unrecognized status fall back to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Pending,
    #[default]
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(TransactionStatus::Success),
            "pending" => Some(TransactionStatus::Pending),
            "failed" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded payment. Immutable once inserted into the ledger.
///
/// `id` and `timestamp` are optional because a candidate may arrive without
/// them (the ledger assigns both at insertion), and historical entries pulled
/// from the gateway may be missing any of the optional fields. Every read
/// site supplies a placeholder rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_type: CardType,
    #[serde(default)]
    pub card_hash: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Builds a transaction from validated form input. The card number is
    /// stored in its grouped display form; brand and fingerprint are derived
    /// from the digits, never taken from the caller.
    pub fn new(
        name: &str,
        phone_number: &str,
        card_number: &str,
        amount: f64,
        status: TransactionStatus,
    ) -> Self {
        let digits = card::strip_non_digits(card_number);
        Self {
            id: None,
            name: name.trim().to_string(),
            phone_number: card::strip_non_digits(phone_number),
            card_number: card::format_card_number(&digits),
            card_type: card::detect_card_type(&digits),
            card_hash: Some(card::generate_card_hash(&digits)),
            amount,
            status,
            timestamp: None,
        }
    }

    /// Canonical digit-only card number, the only form used for equality
    /// checks. The stored value is display-formatted with spaces, so
    /// comparing it directly would silently break the velocity rule.
    pub fn card_digits(&self) -> String {
        card::strip_non_digits(&self.card_number)
    }

    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("N/A")
    }

    pub fn display_hash(&self) -> &str {
        self.card_hash.as_deref().unwrap_or("N/A")
    }
}
