//! ==============================================================================
//! main.rs - temp-host entry point
//! ==============================================================================
//!
//! purpose:
//!     wires configuration, the telemetry store, the optional sensor poll
//!     loop and the web server together.
//!
//! architecture:
//!
//!     ┌──────────────────────────────────────────────────────┐
//!     │                 temp-host (this file)                 │
//!     │  ┌─────────────┐                 ┌─────────────────┐  │
//!     │  │ poll loop   │                 │ web server      │  │
//!     │  │ (5s cycle)  │                 │ (port 5000)     │  │
//!     │  └──────┬──────┘                 └────────┬────────┘  │
//!     │         │ record             record / read│           │
//!     │         └───────────────┬─────────────────┘           │
//!     │                   ┌─────┴─────┐                       │
//!     │                   │   store   │ <- store.rs           │
//!     │                   └───────────┘                       │
//!     └─────────┬────────────────────────────────────────────┘
//!               │ spoke only: POST {"temperatura": ..}
//!               ▼
//!        ┌─────────────┐
//!        │ hub /update │
//!        └─────────────┘
//!
//! the poll loop only runs when `sensor.enabled` is set; it is never
//! cancelled and lives until the process exits.
//!
//! ==============================================================================

use temp_host::config::{HostConfig, Role};
use temp_host::forward::Forwarder;
use temp_host::poller::Poller;
use temp_host::sensor::ThermalZone;
use temp_host::store::TelemetryStore;
use temp_host::{api, telemetry};

use anyhow::{Context, Result};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  temp-host - temperature hub");
    println!("===========================================================");

    // step 1: load configuration
    let mut config = HostConfig::load_or_default();
    config.apply_env_overrides();
    config.print_summary();

    telemetry::init_logging(&config.logging)?;

    // step 2: the one store shared by the poller and the web server
    let store = TelemetryStore::new(config.store.capacity);

    // step 3: sensor polling in background
    if config.sensor.enabled {
        let sensor = Arc::new(ThermalZone::new(config.sensor.path.clone()));
        let mut poller = Poller::new(
            sensor,
            store.clone(),
            config.sensor.interval(),
            config.sensor.error_backoff(),
        )
        .show_readings(config.logging.show_readings);

        if let Some(hub_url) = config.cluster.forward_url() {
            let forwarder = Forwarder::new(hub_url, config.cluster.timeout())
                .context("failed to build hub client")?;
            tracing::info!(hub = %hub_url, node = %config.cluster.node_id, "forwarding readings");
            poller = poller.with_forwarder(forwarder);
        }

        tokio::spawn(poller.run());
    } else if config.cluster.forwards() {
        tracing::warn!("role is spoke but sensor polling is disabled; nothing will be forwarded");
    }

    if config.cluster.role == Role::Spoke && !config.cluster.forwards() {
        tracing::warn!("role is spoke but no hub_url is configured; readings stay local");
    }

    // step 4: web server in foreground
    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("dashboard live at http://{}", addr);

    axum::serve(listener, api::router(store))
        .await
        .context("web server error")?;
    Ok(())
}
