//! Periodic monitoring scheduler.
//!
//! One background loop ticks at a fixed period and sweeps every monitored
//! target: tenants and urls are snapshot-enumerated, each target is probed
//! in its own task, and each result is folded back into the registry. A
//! sweep that is still running when the next tick fires causes that tick to
//! be skipped outright; sweeps never queue or overlap.

use crate::probe::ProbeExecutor;
use crate::registry::TenantRegistry;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Drives periodic probing of all registered targets.
pub struct Scheduler {
    registry: Arc<TenantRegistry>,
    executor: ProbeExecutor,
    tick_interval: Duration,
    sweep_gate: Arc<Semaphore>,
    stop: Mutex<Option<broadcast::Sender<()>>>,
}

impl Scheduler {
    pub fn new(
        registry: Arc<TenantRegistry>,
        executor: ProbeExecutor,
        tick_interval: Duration,
    ) -> Self {
        Self {
            registry,
            executor,
            tick_interval,
            sweep_gate: Arc::new(Semaphore::new(1)),
            stop: Mutex::new(None),
        }
    }

    /// Start the periodic sweep loop in a background task.
    pub async fn start(&self) {
        let registry = self.registry.clone();
        let executor = self.executor.clone();
        let sweep_gate = self.sweep_gate.clone();
        let tick_interval = self.tick_interval;

        let (tx, mut rx) = broadcast::channel(1);
        {
            let mut stop_guard = self.stop.lock().await;
            *stop_guard = Some(tx);
        }

        tracing::info!("Scheduler started, sweeping every {:?}", tick_interval);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately; targets
            // are probed at registration, so wait a full period instead.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = rx.recv() => break,
                    _ = interval.tick() => {
                        let permit = match sweep_gate.clone().try_acquire_owned() {
                            Ok(p) => p,
                            Err(_) => {
                                tracing::warn!("Skipping sweep: previous sweep still in progress");
                                continue;
                            }
                        };

                        let registry = registry.clone();
                        let executor = executor.clone();
                        tokio::spawn(async move {
                            let _permit: OwnedSemaphorePermit = permit;
                            run_sweep(registry, executor).await;
                        });
                    }
                }
            }

            tracing::info!("Scheduler stopped");
        });
    }

    /// Signal the sweep loop to stop. In-flight probes run to completion.
    pub async fn stop(&self) {
        let stop = self.stop.lock().await;
        if let Some(tx) = stop.as_ref() {
            let _ = tx.send(());
        }
    }
}

/// Probe every monitored target once and fold the results in.
///
/// Targets added mid-sweep are picked up on the next tick; results for
/// targets removed mid-sweep are dropped by the registry fold.
async fn run_sweep(registry: Arc<TenantRegistry>, executor: ProbeExecutor) {
    let started = Instant::now();
    let mut join_set = JoinSet::new();
    let mut scheduled = 0usize;

    for tenant in registry.all_tenants() {
        for url in registry.urls_for(&tenant) {
            let registry = registry.clone();
            let executor = executor.clone();
            let tenant = tenant.clone();
            scheduled += 1;

            join_set.spawn(async move {
                // Spread probe starts to avoid a thundering herd each tick.
                let jitter = rand::random::<u64>() % 100;
                tokio::time::sleep(Duration::from_millis(jitter)).await;

                let outcome = executor.probe(&url).await;
                if !registry.record_probe(&tenant, &url, outcome) {
                    tracing::debug!("Dropped probe result for removed target {}", url);
                }
            });
        }
    }

    while join_set.join_next().await.is_some() {}

    tracing::debug!(
        "Sweep finished: {} targets in {:?}",
        scheduled,
        started.elapsed()
    );
}
