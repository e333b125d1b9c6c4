//! Tenant registry: per-tenant collections of monitored targets.
//!
//! All monitoring state lives here for the lifetime of the process; there is
//! no durable storage behind it.

mod history;
mod models;

pub use history::*;
pub use models::*;

use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Registry error types.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("target is already monitored")]
    AlreadyExists,
    #[error("target is not monitored")]
    NotFound,
}

/// Thread-safe registry mapping tenants to their monitored targets.
///
/// One lock guards the whole map: `record_probe` applies counters and history
/// under the write lock as a single unit, and readers clone snapshots under
/// the read lock. The lock is never held across an await point; probing
/// happens entirely outside it.
pub struct TenantRegistry {
    tenants: RwLock<HashMap<String, Vec<TargetRecord>>>,
    history_capacity: usize,
}

impl TenantRegistry {
    /// Create an empty registry whose targets retain up to
    /// `history_capacity` probe outcomes each.
    pub fn new(history_capacity: usize) -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            history_capacity,
        }
    }

    /// Register `url` for `tenant` in `Pending` state.
    ///
    /// Returns the fresh snapshot, or `AlreadyExists` if the (tenant, url)
    /// pair is already monitored. The caller validates the URL first.
    pub fn add(&self, tenant: &str, url: &str) -> Result<TargetSnapshot, RegistryError> {
        let mut tenants = self.tenants.write().unwrap();
        let targets = tenants.entry(tenant.to_string()).or_default();

        if targets.iter().any(|t| t.url == url) {
            return Err(RegistryError::AlreadyExists);
        }

        let record = TargetRecord::new(url.to_string(), Utc::now(), self.history_capacity);
        let snapshot = record.snapshot();
        targets.push(record);
        Ok(snapshot)
    }

    /// Remove `url` from `tenant`'s list, destroying its history with it.
    pub fn remove(&self, tenant: &str, url: &str) -> Result<(), RegistryError> {
        let mut tenants = self.tenants.write().unwrap();
        let targets = tenants.get_mut(tenant).ok_or(RegistryError::NotFound)?;

        let before = targets.len();
        targets.retain(|t| t.url != url);
        if targets.len() == before {
            return Err(RegistryError::NotFound);
        }

        if targets.is_empty() {
            tenants.remove(tenant);
        }
        Ok(())
    }

    /// Snapshot of a single target.
    pub fn get(&self, tenant: &str, url: &str) -> Result<TargetSnapshot, RegistryError> {
        let tenants = self.tenants.read().unwrap();
        tenants
            .get(tenant)
            .and_then(|targets| targets.iter().find(|t| t.url == url))
            .map(TargetRecord::snapshot)
            .ok_or(RegistryError::NotFound)
    }

    /// Whether the (tenant, url) pair is currently monitored.
    pub fn contains(&self, tenant: &str, url: &str) -> bool {
        let tenants = self.tenants.read().unwrap();
        tenants
            .get(tenant)
            .is_some_and(|targets| targets.iter().any(|t| t.url == url))
    }

    /// Snapshots of all of `tenant`'s targets, in registration order.
    pub fn list(&self, tenant: &str) -> Vec<TargetSnapshot> {
        let tenants = self.tenants.read().unwrap();
        tenants
            .get(tenant)
            .map(|targets| targets.iter().map(TargetRecord::snapshot).collect())
            .unwrap_or_default()
    }

    /// All tenant ids with at least one monitored target.
    pub fn all_tenants(&self) -> Vec<String> {
        let tenants = self.tenants.read().unwrap();
        tenants.keys().cloned().collect()
    }

    /// The urls `tenant` currently monitors, in registration order.
    pub fn urls_for(&self, tenant: &str) -> Vec<String> {
        let tenants = self.tenants.read().unwrap();
        tenants
            .get(tenant)
            .map(|targets| targets.iter().map(|t| t.url.clone()).collect())
            .unwrap_or_default()
    }

    /// Fold a completed probe into the matching record.
    ///
    /// Returns `false` when the target no longer exists — the outcome of a
    /// probe that raced with a removal is dropped here without error.
    pub fn record_probe(&self, tenant: &str, url: &str, outcome: ProbeOutcome) -> bool {
        let mut tenants = self.tenants.write().unwrap();
        match tenants
            .get_mut(tenant)
            .and_then(|targets| targets.iter_mut().find(|t| t.url == url))
        {
            Some(record) => {
                record.record_probe(outcome);
                true
            }
            None => false,
        }
    }

    /// Up to `limit` most recent outcomes for a target, most recent first.
    pub fn history(
        &self,
        tenant: &str,
        url: &str,
        limit: usize,
    ) -> Result<Vec<ProbeOutcome>, RegistryError> {
        let tenants = self.tenants.read().unwrap();
        tenants
            .get(tenant)
            .and_then(|targets| targets.iter().find(|t| t.url == url))
            .map(|record| record.history.recent(limit))
            .ok_or(RegistryError::NotFound)
    }
}
