//! In-memory session ledger.
//!
//! The ledger is the single source of truth for everything the dashboard
//! shows. All additions funnel through [`Ledger::insert`]; statistics are
//! recomputed from the entries on every call, never cached.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionStatus};
use crate::services::fraud;

/// Default width of the duplicate-suppression window. Two submissions with
/// the same phone number and amount inside this window are treated as one
/// event. Tunable via `DUPLICATE_WINDOW_MS`.
pub const DEFAULT_DUPLICATE_WINDOW_MS: i64 = 1_500;

/// Aggregate counts derived from the current ledger contents.
///
/// `fraudulent` is evaluated against the full current ledger, so the count
/// can change retroactively as new entries arrive or the velocity window
/// slides past old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total: usize,
    pub success: usize,
    pub pending: usize,
    pub failed: usize,
    pub fraudulent: usize,
}

/// Status dimension of the dashboard filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(TransactionStatus),
}

impl FromStr for StatusFilter {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "all" {
            return Ok(StatusFilter::All);
        }
        TransactionStatus::parse(value)
            .map(StatusFilter::Only)
            .ok_or(())
    }
}

/// Ordered collection of accepted transactions, newest first.
#[derive(Debug, Clone)]
pub struct Ledger {
    entries: Vec<Transaction>,
    duplicate_window_ms: i64,
}

impl Ledger {
    pub fn new(duplicate_window_ms: i64) -> Self {
        Self {
            entries: Vec::new(),
            duplicate_window_ms,
        }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a candidate unless it duplicates an existing entry. Returns
    /// `true` iff the ledger changed.
    ///
    /// A candidate is a duplicate when its id is already present, or when an
    /// existing entry has the same phone number and amount within the
    /// duplicate-suppression window. Accepted candidates get an id and a
    /// timestamp if they arrived without one, then land at the front
    /// (newest-first display order). This is the only code path that may
    /// append to the ledger.
    pub fn insert(&mut self, mut candidate: Transaction) -> bool {
        let candidate_ts = candidate.timestamp.unwrap_or_else(Utc::now);

        if let Some(id) = candidate.id.as_deref() {
            if self.entries.iter().any(|e| e.id.as_deref() == Some(id)) {
                return false;
            }
        }

        let duplicate = self.entries.iter().any(|e| {
            e.phone_number == candidate.phone_number
                && e.amount == candidate.amount
                && e.timestamp.is_some_and(|ts| {
                    (candidate_ts - ts).num_milliseconds().abs() < self.duplicate_window_ms
                })
        });
        if duplicate {
            return false;
        }

        if candidate.id.is_none() {
            candidate.id = Some(Uuid::new_v4().to_string());
        }
        if candidate.timestamp.is_none() {
            candidate.timestamp = Some(candidate_ts);
        }
        self.entries.insert(0, candidate);
        true
    }

    /// Merges a remote transaction list through the normal dedup contract.
    /// Never replaces the ledger wholesale; returns how many entries were new.
    pub fn merge(&mut self, remote: Vec<Transaction>) -> usize {
        let mut inserted = 0;
        for tx in remote {
            if self.insert(tx) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Recomputes aggregate statistics from the current entries.
    pub fn stats(&self, now: DateTime<Utc>) -> LedgerStats {
        let mut stats = LedgerStats {
            total: self.entries.len(),
            success: 0,
            pending: 0,
            failed: 0,
            fraudulent: 0,
        };
        for entry in &self.entries {
            match entry.status {
                TransactionStatus::Success => stats.success += 1,
                TransactionStatus::Pending => stats.pending += 1,
                TransactionStatus::Failed => stats.failed += 1,
            }
            if fraud::assess(entry, &self.entries, now).is_fraudulent {
                stats.fraudulent += 1;
            }
        }
        stats
    }

    /// Returns entries matching the status filter, preserving ledger order.
    pub fn filter(&self, filter: StatusFilter) -> Vec<&Transaction> {
        self.entries
            .iter()
            .filter(|e| match filter {
                StatusFilter::All => true,
                StatusFilter::Only(status) => e.status == status,
            })
            .collect()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_WINDOW_MS)
    }
}
