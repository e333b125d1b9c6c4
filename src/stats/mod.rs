//! Derived monitoring statistics.
//!
//! Pure computations over registry snapshots; nothing here holds state, so
//! every query reflects the latest recorded probes.

use crate::registry::{TargetSnapshot, TargetStatus, TenantRegistry};

use serde::Serialize;

/// Aggregate statistics for one tenant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TenantStats {
    /// Number of monitored URLs.
    pub count: usize,
    /// Number of URLs whose latest probe was online.
    pub online_count: usize,
    /// `sum(online_checks) / sum(total_checks)` across the tenant's targets,
    /// 0.0 when no checks have run.
    pub overall_uptime: f64,
    pub total_checks: u64,
}

/// Whole-process statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlobalStats {
    /// Tenants with at least one monitored target.
    pub active_tenant_count: usize,
    pub total_monitored_urls: usize,
}

/// Fold per-target snapshots into tenant-level aggregates.
pub fn tenant_stats(targets: &[TargetSnapshot]) -> TenantStats {
    let total_checks: u64 = targets.iter().map(|t| t.total_checks).sum();
    let online_checks: u64 = targets.iter().map(|t| t.online_checks).sum();

    let overall_uptime = if total_checks > 0 {
        online_checks as f64 / total_checks as f64
    } else {
        0.0
    };

    TenantStats {
        count: targets.len(),
        online_count: targets
            .iter()
            .filter(|t| t.current_status == TargetStatus::Online)
            .count(),
        overall_uptime,
        total_checks,
    }
}

/// Count tenants and targets across the whole registry.
pub fn global_stats(registry: &TenantRegistry) -> GlobalStats {
    let tenants = registry.all_tenants();
    let total_monitored_urls = tenants.iter().map(|t| registry.list(t).len()).sum();

    GlobalStats {
        active_tenant_count: tenants.len(),
        total_monitored_urls,
    }
}
