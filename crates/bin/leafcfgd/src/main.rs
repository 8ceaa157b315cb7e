//! # leafcfgd — Leaf configuration daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`leafcfg.toml`, env vars)
//! - Initialize `tracing` with an `EnvFilter`
//! - Build the schema registry from the configured vehicle defaults
//! - Construct the config store and event bus, inject them into the form processor
//! - Build the axum router and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use leafcfg_adapter_http_axum::state::AppState;
use leafcfg_app::config_store::InMemoryConfigStore;
use leafcfg_app::event_bus::InProcessEventBus;
use leafcfg_app::services::parameter_form::ParameterFormProcessor;
use leafcfg_domain::event::ParamsCommitted;
use leafcfg_domain::leaf;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let registry = leaf::registry(&config.leaf)?;
    let schemas: Vec<&str> = registry.names().collect();
    tracing::debug!(?schemas, "schema registry built");

    // Event bus
    let event_bus = InProcessEventBus::new(config.events.capacity);
    tokio::spawn(log_commits(event_bus.subscribe()));

    // Services
    let processor = ParameterFormProcessor::new(registry, InMemoryConfigStore::new(), event_bus);

    // HTTP
    let app = leafcfg_adapter_http_axum::router::build(AppState::new(processor));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "leafcfgd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("leafcfgd stopped");
    Ok(())
}

async fn log_commits(mut events: broadcast::Receiver<ParamsCommitted>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::info!(
                schema = %event.schema,
                namespace = %event.namespace,
                keys = ?event.keys,
                at = %event.timestamp,
                "parameters committed"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "commit log lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
