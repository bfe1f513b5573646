use anyhow::Context;
use dtra_config::{load_config, GatewayConfig};
use dtra_gateway::Gateway;
use tracing::{error, info};

const DEFAULT_CONFIG: &str = "config/dtra.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config path: first argument, then DTRA_CONFIG
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DTRA_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let config: GatewayConfig =
        load_config(&path).with_context(|| format!("loading configuration from {path}"))?;

    // Initialize logging
    dtra_logging::init_with_level(&config.log_level);

    // Register metrics
    dtra_metrics::register_metrics().context("registering metrics")?;

    info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        diameter_addr = %config.diameter.addr,
        "Starting Diameter-RADIUS gateway"
    );

    let gateway = Gateway::start(&config).await.context("starting gateway")?;
    info!(addr = %gateway.local_addr()?, "Listening for Diameter peers");

    if let Err(e) = gateway.run().await {
        error!(error = %e, "Gateway stopped");
        return Err(e.into());
    }
    Ok(())
}
