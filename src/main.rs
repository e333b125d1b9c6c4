//! PulseWatch - Multi-tenant URL availability monitor
//!
//! Tenants register URLs; a background scheduler probes them once a minute
//! and the command API answers status, uptime, and history queries from
//! in-memory state.

mod config;
mod engine;
mod probe;
mod registry;
mod scheduler;
mod stats;
mod web;

use config::MonitorConfig;
use engine::MonitoringEngine;
use scheduler::Scheduler;
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("pulsewatch=info".parse()?))
        .init();

    // Load configuration
    let cfg = MonitorConfig::load();
    tracing::info!("Starting PulseWatch on port {}...", cfg.http_port);
    tracing::info!(
        "Sweep every {:?}, probe timeout {:?}, history capacity {}",
        cfg.tick_interval,
        cfg.probe_timeout,
        cfg.history_capacity
    );

    // Create the engine and the periodic scheduler
    let engine = Arc::new(MonitoringEngine::new(&cfg)?);
    let scheduler = Scheduler::new(engine.registry(), engine.executor(), cfg.tick_interval);
    scheduler.start().await;

    // Start the command API
    let server = Server::new(&cfg, engine);
    server.start().await?;

    Ok(())
}
