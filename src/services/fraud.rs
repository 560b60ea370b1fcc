//! Rule-based fraud scoring.
//!
//! An assessment is a pure function of (transaction, ledger snapshot, now).
//! It is recomputed on every render and never stored on the transaction, so
//! flags can legitimately change as time passes or new entries arrive.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Transaction;

/// Amounts strictly above this fire the large-amount rule.
pub const AMOUNT_THRESHOLD: f64 = 10_000.0;
/// Width of the velocity window, measured back from `now`.
pub const VELOCITY_WINDOW_MS: i64 = 60_000;

pub const REASON_LARGE_AMOUNT: &str = "Amount exceeds ₹10,000";
pub const REASON_VELOCITY: &str = "Multiple transactions within a minute";
pub const REASON_SUSPICIOUS_PREFIX: &str = "Suspicious card number";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FraudAssessment {
    pub is_fraudulent: bool,
    pub reasons: Vec<String>,
}

/// Scores one transaction against the current ledger snapshot.
///
/// Rules fire independently and append their reasons in a fixed order:
/// large amount, velocity, suspicious prefix. The velocity window is
/// anchored at `now` (wall clock at assessment), not at the transaction's
/// own timestamp, and card numbers are compared on their canonical
/// digit-only form so display formatting can never disable the rule.
/// Missing fields on the transaction or on ledger entries count as
/// non-matching rather than erroring.
pub fn assess(
    transaction: &Transaction,
    entries: &[Transaction],
    now: DateTime<Utc>,
) -> FraudAssessment {
    let mut reasons = Vec::new();

    if transaction.amount > AMOUNT_THRESHOLD {
        reasons.push(REASON_LARGE_AMOUNT.to_string());
    }

    let digits = transaction.card_digits();
    if !digits.is_empty() {
        let recent = entries
            .iter()
            .filter(|entry| {
                entry.card_digits() == digits
                    && entry.timestamp.is_some_and(|ts| {
                        now.signed_duration_since(ts).num_milliseconds() < VELOCITY_WINDOW_MS
                    })
            })
            .count();
        if recent > 1 {
            reasons.push(REASON_VELOCITY.to_string());
        }

        if digits.starts_with("0000") {
            reasons.push(REASON_SUSPICIOUS_PREFIX.to_string());
        }
    }

    FraudAssessment {
        is_fraudulent: !reasons.is_empty(),
        reasons,
    }
}
