pub mod transactions;

use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub ledger_size: usize,
    pub authorization: String,
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().await;

    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        ledger_size: ledger.len(),
        authorization: if state.gateway.is_simulated() {
            "simulated".to_string()
        } else {
            "gateway".to_string()
        },
    })
}
