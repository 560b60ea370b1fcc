use crate::config::Config;
use anyhow::{Context, Result};
use std::time::Duration;

pub struct ValidationReport {
    pub environment: bool,
    pub gateway: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.gateway
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Gateway Connectivity:  {}", status(self.gateway));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config) -> Result<ValidationReport> {
    let mut report = ValidationReport {
        environment: true,
        gateway: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {}", e));
    }

    // Simulated mode has no remote dependency to probe.
    if let Some(gateway_url) = &config.gateway_url {
        if let Err(e) = validate_gateway(gateway_url).await {
            report.gateway = false;
            report.errors.push(format!("Gateway: {}", e));
        }
    }

    Ok(report)
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }
    if config.duplicate_window_ms <= 0 {
        anyhow::bail!("DUPLICATE_WINDOW_MS must be greater than 0");
    }

    if let Some(gateway_url) = &config.gateway_url {
        url::Url::parse(gateway_url).context("GATEWAY_URL is not a valid URL")?;
    }

    Ok(())
}

async fn validate_gateway(gateway_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let response = client
        .get(gateway_url)
        .send()
        .await
        .context("Failed to connect to authorization gateway")?;

    if response.status().is_server_error() {
        anyhow::bail!("Gateway returned status: {}", response.status());
    }

    Ok(())
}
