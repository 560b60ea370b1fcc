use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

use crate::services::ledger::DEFAULT_DUPLICATE_WINDOW_MS;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Authorization gateway base URL. Absent means simulated authorization.
    pub gateway_url: Option<String>,
    /// Width of the duplicate-suppression window in milliseconds.
    pub duplicate_window_ms: i64,
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let gateway_url = env::var("GATEWAY_URL").ok().filter(|v| !v.trim().is_empty());
        if let Some(raw) = &gateway_url {
            url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("GATEWAY_URL is not a valid URL: {e}"))?;
        }

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            gateway_url,
            duplicate_window_ms: env::var("DUPLICATE_WINDOW_MS")
                .unwrap_or_else(|_| DEFAULT_DUPLICATE_WINDOW_MS.to_string())
                .parse()?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }
}
