//! The monitoring engine.
//!
//! One `MonitoringEngine` is constructed at startup and injected into the
//! scheduler and the command layer; it owns the registry and the probe
//! executor, and exposes every operation the command layer may invoke.

use crate::config::MonitorConfig;
use crate::probe::ProbeExecutor;
use crate::registry::{ProbeOutcome, RegistryError, TargetSnapshot, TenantRegistry};
use crate::stats::{self, GlobalStats, TenantStats};

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Engine error types, returned to the command layer for presentation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A successful registration: the target's state after its initial probe,
/// plus that probe's outcome.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub target: TargetSnapshot,
    pub initial: ProbeOutcome,
}

/// Context object owning all monitoring state.
pub struct MonitoringEngine {
    registry: Arc<TenantRegistry>,
    executor: ProbeExecutor,
}

impl MonitoringEngine {
    pub fn new(cfg: &MonitorConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            registry: Arc::new(TenantRegistry::new(cfg.history_capacity)),
            executor: ProbeExecutor::new(cfg.probe_timeout)?,
        })
    }

    /// The shared registry, for the scheduler's sweep.
    pub fn registry(&self) -> Arc<TenantRegistry> {
        self.registry.clone()
    }

    /// The shared probe executor.
    pub fn executor(&self) -> ProbeExecutor {
        self.executor.clone()
    }

    /// Register a URL for a tenant and probe it immediately.
    ///
    /// The URL must parse as an absolute `http`/`https` URL; anything else
    /// is rejected before any state changes.
    pub async fn register_target(
        &self,
        tenant: &str,
        url: &str,
    ) -> Result<Registration, EngineError> {
        validate_url(url)?;
        self.registry.add(tenant, url)?;

        tracing::info!("Registered {} for tenant {}", url, tenant);

        // Initial check, through the same fold path the scheduler uses. If
        // the target was removed while the probe was in flight the fold is a
        // no-op and the registration reads as gone.
        let outcome = self.executor.probe(url).await;
        self.registry.record_probe(tenant, url, outcome.clone());

        let target = self.registry.get(tenant, url)?;
        Ok(Registration {
            target,
            initial: outcome,
        })
    }

    /// Stop monitoring a URL, discarding its counters and history.
    pub fn unregister_target(&self, tenant: &str, url: &str) -> Result<(), EngineError> {
        self.registry.remove(tenant, url)?;
        tracing::info!("Unregistered {} for tenant {}", url, tenant);
        Ok(())
    }

    /// Probe a monitored URL on demand and fold the result in.
    pub async fn check_now(&self, tenant: &str, url: &str) -> Result<ProbeOutcome, EngineError> {
        if !self.registry.contains(tenant, url) {
            return Err(RegistryError::NotFound.into());
        }

        let outcome = self.executor.probe(url).await;
        self.registry.record_probe(tenant, url, outcome.clone());
        Ok(outcome)
    }

    /// All of a tenant's targets, in registration order.
    pub fn list_targets(&self, tenant: &str) -> Vec<TargetSnapshot> {
        self.registry.list(tenant)
    }

    /// Recent probe outcomes for a target, most recent first.
    pub fn history(
        &self,
        tenant: &str,
        url: &str,
        limit: usize,
    ) -> Result<Vec<ProbeOutcome>, EngineError> {
        Ok(self.registry.history(tenant, url, limit)?)
    }

    /// Aggregate statistics for one tenant; zeroed when it has no targets.
    pub fn tenant_stats(&self, tenant: &str) -> TenantStats {
        stats::tenant_stats(&self.registry.list(tenant))
    }

    /// Whole-process statistics.
    pub fn global_stats(&self) -> GlobalStats {
        stats::global_stats(&self.registry)
    }
}

fn validate_url(input: &str) -> Result<(), EngineError> {
    let parsed =
        Url::parse(input).map_err(|e| EngineError::InvalidUrl(format!("{}: {}", input, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(EngineError::InvalidUrl(format!(
            "unsupported scheme: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ProbeStatus, TargetStatus};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn engine() -> MonitoringEngine {
        MonitoringEngine::new(&MonitorConfig {
            probe_timeout: Duration::from_secs(2),
            ..MonitorConfig::default()
        })
        .unwrap()
    }

    /// Serve `200 OK` to every connection until dropped.
    async fn ok_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;
                    let _ = stream
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                        .await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_url() {
        let engine = engine();
        let err = engine.register_target("u1", "not-a-url").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidUrl(_)));

        // Rejected before any mutation: no registry entry was created.
        assert!(engine.list_targets("u1").is_empty());
        assert_eq!(engine.global_stats().active_tenant_count, 0);
    }

    #[tokio::test]
    async fn test_register_rejects_non_http_scheme() {
        let engine = engine();
        let err = engine
            .register_target("u1", "ftp://example.com/file")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_register_probes_immediately() {
        let engine = engine();
        let url = ok_server().await;

        let registration = engine.register_target("u1", &url).await.unwrap();
        assert_eq!(registration.initial.status, ProbeStatus::Online);
        assert_eq!(registration.initial.status_code, Some(200));
        assert_eq!(registration.target.current_status, TargetStatus::Online);
        assert_eq!(registration.target.total_checks, 1);

        // One registered target, probed online once.
        let stats = engine.tenant_stats("u1");
        assert_eq!(stats.count, 1);
        assert_eq!(stats.online_count, 1);
        assert!((stats.overall_uptime - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let engine = engine();
        let url = ok_server().await;

        engine.register_target("u1", &url).await.unwrap();
        let err = engine.register_target("u1", &url).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Registry(RegistryError::AlreadyExists)
        ));
        assert_eq!(engine.list_targets("u1").len(), 1);
    }

    #[tokio::test]
    async fn test_check_now_unknown_target() {
        let engine = engine();
        let err = engine
            .check_now("u1", "https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Registry(RegistryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_check_now_folds_into_record() {
        let engine = engine();
        let url = ok_server().await;

        engine.register_target("u1", &url).await.unwrap();
        let outcome = engine.check_now("u1", &url).await.unwrap();
        assert_eq!(outcome.status, ProbeStatus::Online);

        let target = &engine.list_targets("u1")[0];
        assert_eq!(target.total_checks, 2);
        assert_eq!(target.online_checks, 2);

        let history = engine.history("u1", &url, 10).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_unregister_then_history_is_not_found() {
        let engine = engine();
        let url = ok_server().await;

        engine.register_target("u1", &url).await.unwrap();
        engine.unregister_target("u1", &url).unwrap();

        assert!(engine.history("u1", &url, 10).is_err());
        assert_eq!(engine.tenant_stats("u1").count, 0);
    }
}
