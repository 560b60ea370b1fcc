//! Payment submission and ledger read endpoints.
//!
//! The read endpoints are pure derivations of the ledger: calling them never
//! mutates state, so rendering the same ledger twice yields the same output
//! (modulo the wall-clock velocity window).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::card::strip_non_digits;
use crate::domain::{CardType, Transaction, TransactionStatus};
use crate::error::AppError;
use crate::services::fraud::{self, FraudAssessment};
use crate::services::ledger::{LedgerStats, StatusFilter};
use crate::utils::sanitize::mask_card_number;
use crate::validation;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub name: String,
    pub phone_number: String,
    pub card_number: String,
    pub amount: f64,
}

/// Render form of a transaction: missing id/hash become "N/A" placeholders
/// instead of propagating an error into the display.
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub card_number: String,
    pub card_type: CardType,
    pub card_hash: String,
    pub amount: f64,
    pub status: TransactionStatus,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.display_id().to_string(),
            name: tx.name.clone(),
            phone_number: tx.phone_number.clone(),
            card_number: tx.card_number.clone(),
            card_type: tx.card_type,
            card_hash: tx.display_hash().to_string(),
            amount: tx.amount,
            status: tx.status,
            timestamp: tx.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub duplicate: bool,
    pub transaction: TransactionView,
    pub fraud: FraudAssessment,
}

#[derive(Debug, Serialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub transaction: TransactionView,
    pub fraud: FraudAssessment,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshSummary {
    pub received: usize,
    pub inserted: usize,
}

/// Submit a payment: validate, authorize, record.
///
/// A suppressed duplicate is not an error — the response carries
/// `duplicate: true` with status 200 instead of 201, and the ledger is
/// unchanged.
pub async fn submit_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_payment(
        &payload.name,
        &payload.phone_number,
        &payload.card_number,
        payload.amount,
    )?;

    let digits = strip_non_digits(&payload.card_number);
    tracing::info!(
        card = %mask_card_number(&digits),
        amount = payload.amount,
        "Authorizing payment"
    );

    let decision = state.gateway.authorize(&digits, payload.amount).await?;

    let mut candidate = Transaction::new(
        &payload.name,
        &payload.phone_number,
        &digits,
        payload.amount,
        decision.resolved_status(),
    );
    candidate.id = decision.identifier().map(str::to_string);
    if decision.card_hash.is_some() {
        candidate.card_hash = decision.card_hash.clone();
    }

    let mut ledger = state.ledger.write().await;
    let inserted = ledger.insert(candidate.clone());
    let recorded = if inserted {
        ledger.entries()[0].clone()
    } else {
        candidate
    };
    let assessment = fraud::assess(&recorded, ledger.entries(), Utc::now());

    tracing::info!(
        transaction_id = %recorded.display_id(),
        status = %recorded.status,
        duplicate = !inserted,
        "Payment recorded"
    );

    let status_code = if inserted { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status_code,
        Json(PaymentResponse {
            duplicate: !inserted,
            transaction: TransactionView::from(&recorded),
            fraud: assessment,
        }),
    ))
}

/// List ledger entries newest first, optionally filtered by status, each
/// paired with a freshly computed fraud assessment.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let raw = params.status.as_deref().unwrap_or("all");
    let filter = raw
        .parse::<StatusFilter>()
        .map_err(|_| AppError::BadRequest(format!("unknown status filter: {raw}")))?;

    let ledger = state.ledger.read().await;
    let now = Utc::now();
    let entries = ledger
        .filter(filter)
        .into_iter()
        .map(|tx| LedgerEntry {
            fraud: fraud::assess(tx, ledger.entries(), now),
            transaction: TransactionView::from(tx),
        })
        .collect();

    Ok(Json(entries))
}

pub async fn transaction_stats(State(state): State<AppState>) -> Json<LedgerStats> {
    let ledger = state.ledger.read().await;
    Json(ledger.stats(Utc::now()))
}

/// Merge the gateway's current transaction list into the local ledger.
/// Entries go through the normal insert/dedup gate — never a blind replace,
/// so locally known entries that have not round-tripped survive.
pub async fn refresh_transactions(
    State(state): State<AppState>,
    Json(remote): Json<Vec<Transaction>>,
) -> Result<Json<RefreshSummary>, AppError> {
    let received = remote.len();
    let mut ledger = state.ledger.write().await;
    let inserted = ledger.merge(remote);

    tracing::info!(received, inserted, "Merged remote transaction list");

    Ok(Json(RefreshSummary { received, inserted }))
}
