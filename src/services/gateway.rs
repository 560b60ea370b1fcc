//! Authorization gateway boundary.
//!
//! The remote call is opaque: we send the digit-only card number and the
//! amount, and get back a status, an identifier, and a card hash — any of
//! which may be missing. When no gateway URL is configured the client runs
//! in simulated mode and produces a local decision, so the service works
//! standalone.

use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error as FailsafeError, StateMachine};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::card::generate_card_hash;
use crate::domain::TransactionStatus;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),
    #[error("Circuit breaker open: {0}")]
    CircuitBreakerOpen(String),
}

#[derive(Debug, Serialize)]
pub struct AuthorizeRequest {
    pub card_number: String,
    pub amount: f64,
}

/// Gateway response. Every field is optional; the caller substitutes safe
/// defaults rather than failing the submission. Identifiers may arrive as
/// strings or numbers depending on the backend.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorizeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub card_hash: Option<String>,
}

impl AuthorizeResponse {
    /// `transaction_id` preferred, `id` as the fallback key.
    pub fn identifier(&self) -> Option<&str> {
        self.transaction_id.as_deref().or(self.id.as_deref())
    }

    /// Missing or unrecognized statuses degrade to `Failed`.
    pub fn resolved_status(&self) -> TransactionStatus {
        self.status
            .as_deref()
            .and_then(TransactionStatus::parse)
            .unwrap_or_default()
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// HTTP client for the authorization gateway, with a circuit breaker so a
/// flapping backend fails fast instead of tying up submissions.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Option<String>,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl GatewayClient {
    /// `base_url = None` selects simulated mode.
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(Duration::from_secs(30), Duration::from_secs(60));
        let policy = failure_policy::consecutive_failures(3, backoff);
        let circuit_breaker = Config::new().failure_policy(policy).build();

        GatewayClient {
            client,
            base_url,
            circuit_breaker,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.base_url.is_none()
    }

    /// Returns the current state of the circuit breaker.
    pub fn circuit_state(&self) -> String {
        if self.circuit_breaker.is_call_permitted() {
            "closed".to_string()
        } else {
            "open".to_string()
        }
    }

    /// Requests an authorization decision for a digit-only card number.
    pub async fn authorize(
        &self,
        card_digits: &str,
        amount: f64,
    ) -> Result<AuthorizeResponse, GatewayError> {
        let Some(base_url) = &self.base_url else {
            return Ok(self.simulate(card_digits));
        };

        let url = format!("{}/api/authorize", base_url.trim_end_matches('/'));
        let client = self.client.clone();
        let payload = AuthorizeRequest {
            card_number: card_digits.to_string(),
            amount,
        };

        let result = self
            .circuit_breaker
            .call(async move {
                let response = client.post(&url).json(&payload).send().await?;

                if !response.status().is_success() {
                    return Err(GatewayError::InvalidResponse(format!(
                        "gateway returned status {}",
                        response.status()
                    )));
                }

                let decision = response.json::<AuthorizeResponse>().await?;
                Ok(decision)
            })
            .await;

        match result {
            Ok(decision) => Ok(decision),
            Err(FailsafeError::Rejected) => Err(GatewayError::CircuitBreakerOpen(
                "authorization gateway circuit breaker is open".to_string(),
            )),
            Err(FailsafeError::Inner(e)) => Err(e),
        }
    }

    // Local stand-in for the gateway: uniform status draw, fresh id, and the
    // same fingerprint the real backend would compute.
    fn simulate(&self, card_digits: &str) -> AuthorizeResponse {
        let status = match rand::thread_rng().gen_range(0..3) {
            0 => "success",
            1 => "pending",
            _ => "failed",
        };

        AuthorizeResponse {
            status: Some(status.to_string()),
            transaction_id: Some(Uuid::new_v4().to_string()),
            id: None,
            card_hash: Some(generate_card_hash(card_digits)),
        }
    }
}
