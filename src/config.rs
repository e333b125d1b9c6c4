//! Configuration module for PulseWatch.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// HTTP port for the command API (default: 8080)
    pub http_port: u16,
    /// Period of the scheduler sweep (default: 60s)
    pub tick_interval: Duration,
    /// Per-probe timeout ceiling (default: 10s)
    pub probe_timeout: Duration,
    /// Probe outcomes retained per target (default: 50)
    pub history_capacity: usize,
    /// Per-command cooldown window (default: 3s)
    pub command_cooldown: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            tick_interval: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(10),
            history_capacity: 50,
            command_cooldown: Duration::from_secs(3),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PULSEWATCH_HTTP_PORT`: HTTP port (default: 8080)
    /// - `PULSEWATCH_TICK_SECS`: seconds between scheduler sweeps (default: 60)
    /// - `PULSEWATCH_PROBE_TIMEOUT_SECS`: probe timeout in seconds (default: 10)
    /// - `PULSEWATCH_HISTORY_CAPACITY`: retained checks per target (default: 50)
    /// - `PULSEWATCH_COOLDOWN_SECS`: command cooldown in seconds (default: 3)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("PULSEWATCH_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(secs_str) = env::var("PULSEWATCH_TICK_SECS") {
            if let Ok(secs) = secs_str.parse::<u64>() {
                if secs > 0 {
                    cfg.tick_interval = Duration::from_secs(secs);
                }
            }
        }

        if let Ok(secs_str) = env::var("PULSEWATCH_PROBE_TIMEOUT_SECS") {
            if let Ok(secs) = secs_str.parse::<u64>() {
                if secs > 0 {
                    cfg.probe_timeout = Duration::from_secs(secs);
                }
            }
        }

        if let Ok(cap_str) = env::var("PULSEWATCH_HISTORY_CAPACITY") {
            if let Ok(cap) = cap_str.parse::<usize>() {
                if cap > 0 {
                    cfg.history_capacity = cap;
                }
            }
        }

        if let Ok(secs_str) = env::var("PULSEWATCH_COOLDOWN_SECS") {
            if let Ok(secs) = secs_str.parse::<u64>() {
                cfg.command_cooldown = Duration::from_secs(secs);
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.tick_interval, Duration::from_secs(60));
        assert_eq!(cfg.probe_timeout, Duration::from_secs(10));
        assert_eq!(cfg.history_capacity, 50);
        assert_eq!(cfg.command_cooldown, Duration::from_secs(3));
    }
}
