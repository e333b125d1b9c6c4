//! Registry model types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::history::HistoryBuffer;

/// Classification of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Online,
    Offline,
}

/// Status of a monitored target, as of its most recent probe.
///
/// Targets start out `Pending` until their first probe completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Pending,
    Online,
    Offline,
}

impl From<ProbeStatus> for TargetStatus {
    fn from(status: ProbeStatus) -> Self {
        match status {
            ProbeStatus::Online => TargetStatus::Online,
            ProbeStatus::Offline => TargetStatus::Offline,
        }
    }
}

/// The result of one probe against one target. Immutable once created.
///
/// A reachable target carries `status_code`; an unreachable one carries
/// `error`. `response_time_ms` is measured in either case.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl ProbeOutcome {
    /// An `online` outcome for a reachable target.
    pub fn online(status_code: u16, response_time_ms: u64, observed_at: DateTime<Utc>) -> Self {
        Self {
            status: ProbeStatus::Online,
            status_code: Some(status_code),
            response_time_ms,
            error: None,
            observed_at,
        }
    }

    /// An `offline` outcome carrying the failure description.
    pub fn offline(error: String, response_time_ms: u64, observed_at: DateTime<Utc>) -> Self {
        Self {
            status: ProbeStatus::Offline,
            status_code: None,
            response_time_ms,
            error: Some(error),
            observed_at,
        }
    }
}

/// Mutable per-URL monitoring state. Owned by the registry; mutated only
/// through [`TargetRecord::record_probe`].
#[derive(Debug)]
pub struct TargetRecord {
    pub url: String,
    pub added_at: DateTime<Utc>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub current_status: TargetStatus,
    pub total_checks: u64,
    pub online_checks: u64,
    pub last_online_at: Option<DateTime<Utc>>,
    pub last_offline_at: Option<DateTime<Utc>>,
    pub history: HistoryBuffer,
}

impl TargetRecord {
    /// Create a fresh record in `Pending` state with an empty history.
    pub fn new(url: String, added_at: DateTime<Utc>, history_capacity: usize) -> Self {
        Self {
            url,
            added_at,
            last_checked_at: None,
            current_status: TargetStatus::Pending,
            total_checks: 0,
            online_checks: 0,
            last_online_at: None,
            last_offline_at: None,
            history: HistoryBuffer::new(history_capacity),
        }
    }

    /// Fold one probe outcome into the record: status, counters, last-seen
    /// timestamps, and history, as a single unit.
    pub fn record_probe(&mut self, outcome: ProbeOutcome) {
        self.last_checked_at = Some(outcome.observed_at);
        self.current_status = outcome.status.into();
        self.total_checks += 1;

        match outcome.status {
            ProbeStatus::Online => {
                self.online_checks += 1;
                self.last_online_at = Some(outcome.observed_at);
            }
            ProbeStatus::Offline => {
                self.last_offline_at = Some(outcome.observed_at);
            }
        }

        self.history.append(outcome);
    }

    /// Fraction of probes classified online, 0.0 for an unprobed target.
    pub fn uptime_ratio(&self) -> f64 {
        if self.total_checks > 0 {
            self.online_checks as f64 / self.total_checks as f64
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            url: self.url.clone(),
            added_at: self.added_at,
            last_checked_at: self.last_checked_at,
            current_status: self.current_status,
            total_checks: self.total_checks,
            online_checks: self.online_checks,
            last_online_at: self.last_online_at,
            last_offline_at: self.last_offline_at,
            uptime_ratio: self.uptime_ratio(),
        }
    }
}

/// Copy-on-read view of a [`TargetRecord`], handed to readers so queries
/// never observe a half-applied update.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSnapshot {
    pub url: String,
    pub added_at: DateTime<Utc>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub current_status: TargetStatus,
    pub total_checks: u64,
    pub online_checks: u64,
    pub last_online_at: Option<DateTime<Utc>>,
    pub last_offline_at: Option<DateTime<Utc>>,
    pub uptime_ratio: f64,
}
