use anyhow::Result;
use portal_gate::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let metrics_handle = telemetry::init(&config.telemetry)?;

    info!("Starting Portal Gate");
    info!("Base domain: {}", config.gate.base_domain);
    info!("HTTP server listening on {}", config.http_addr());

    server::run(config, metrics_handle).await
}
