use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pudo_connector::host::{AllowAll, InMemoryOrderRepository};
use pudo_connector::{InMemoryShipmentStore, PudoConfig, PudoConnector};

// Demo binary: wires the connector against in-memory host adapters and
// runs the status reconciliation loop until Ctrl-C. Real deployments
// embed the library and supply their own OrderRepository/AccessControl.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pudo_connector=debug")),
        )
        .init();

    tracing::info!("🚀 Starting PUDO connector");

    // === 1. Configuration ===
    let config = PudoConfig::from_env()?;
    tracing::info!(
        environment = ?config.environment,
        base_url = config.base_url(),
        poll_interval_secs = config.poll_interval.as_secs(),
        "Configuration loaded"
    );

    // === 2. Wire components ===
    let store = Arc::new(InMemoryShipmentStore::new());
    let orders = Arc::new(InMemoryOrderRepository::new());
    let connector = PudoConnector::new(config, store, orders, Arc::new(AllowAll))?;

    // === 3. Probe carrier credentials ===
    if connector.client.validate_credentials().await {
        tracing::info!("✅ Carrier credentials validated");
    } else {
        tracing::warn!("⚠️ Carrier credential check failed; calls will be rejected");
    }

    // === 4. Run the status reconciliation loop ===
    let reconciler = connector.reconciler.clone();
    let loop_handle = tokio::spawn(reconciler.clone().run());

    tracing::info!("Reconciler running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutdown signal received");
    reconciler.stop();
    loop_handle.abort();

    tracing::info!("👋 PUDO connector stopped");
    Ok(())
}
