use std::net::SocketAddr;

use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use securepay_core::cli::{self, Cli, Commands};
use securepay_core::config::Config;
use securepay_core::services::{GatewayClient, Ledger};
use securepay_core::{create_app, startup, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Config => {
            cli::handle_config_validate(&config)?;
            let report = startup::validate_environment(&config).await?;
            report.print();
            if !report.is_valid() {
                anyhow::bail!("startup validation failed");
            }
            Ok(())
        }
        Commands::Serve => serve(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let gateway = GatewayClient::new(config.gateway_url.clone());
    if gateway.is_simulated() {
        tracing::info!("No GATEWAY_URL configured, running with simulated authorization");
    } else {
        tracing::info!("Authorization gateway: {:?}", config.gateway_url);
    }

    let state = AppState::new(Ledger::new(config.duplicate_window_ms), gateway);
    let app = create_app(state).layer(build_cors(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

fn build_cors(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        None => CorsLayer::permissive(),
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
