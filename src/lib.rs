pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod services;
pub mod startup;
pub mod utils;
pub mod validation;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::RwLock;

use crate::services::{GatewayClient, Ledger};

/// Shared application state. The ledger is exclusively owned by this process
/// and only ever mutated behind the write lock, inside the ledger's own
/// insert gate.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub gateway: GatewayClient,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(ledger: Ledger, gateway: GatewayClient) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            gateway,
            start_time: Instant::now(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/payments", post(handlers::transactions::submit_payment))
        .route("/transactions", get(handlers::transactions::list_transactions))
        .route("/transactions/stats", get(handlers::transactions::transaction_stats))
        .route("/transactions/refresh", post(handlers::transactions::refresh_transactions))
        .with_state(state)
}
