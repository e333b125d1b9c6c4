//! Web command layer.
//!
//! A thin JSON adapter over the monitoring engine; everything with
//! monitoring semantics lives behind [`MonitoringEngine`].

mod cooldown;
mod handlers;

pub use cooldown::*;
pub use handlers::*;

use crate::config::MonitorConfig;
use crate::engine::MonitoringEngine;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MonitoringEngine>,
    pub cooldowns: Arc<CooldownLedger>,
}

/// HTTP server exposing the monitoring commands.
pub struct Server {
    http_port: u16,
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(cfg: &MonitorConfig, engine: Arc<MonitoringEngine>) -> Self {
        Self {
            http_port: cfg.http_port,
            state: AppState {
                engine,
                cooldowns: Arc::new(CooldownLedger::new(cfg.command_cooldown)),
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            .route("/api/tenants/{tenant}/targets", post(handlers::handle_register_target))
            .route("/api/tenants/{tenant}/targets", get(handlers::handle_list_targets))
            .route("/api/tenants/{tenant}/targets", delete(handlers::handle_unregister_target))
            .route("/api/tenants/{tenant}/check", post(handlers::handle_check_now))
            .route("/api/tenants/{tenant}/history", get(handlers::handle_history))
            .route("/api/tenants/{tenant}/stats", get(handlers::handle_tenant_stats))
            .route("/api/stats", get(handlers::handle_global_stats))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let router = self.routes();

        tracing::info!("Command API listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
