//! Probe execution.
//!
//! A probe is a single HTTP(S) GET against a monitored URL. Every failure
//! mode — server error, connect failure, DNS failure, timeout — is folded
//! into an `offline` outcome; probing never surfaces an error to callers.

use crate::registry::ProbeOutcome;

use chrono::Utc;
use std::time::{Duration, Instant};

/// Any response below this status code counts as reachable. 4xx means the
/// target answered, which is the monitoring semantic being measured.
const ONLINE_STATUS_CEILING: u16 = 500;

/// Executes reachability probes with a shared HTTP client.
#[derive(Clone)]
pub struct ProbeExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl ProbeExecutor {
    /// Build an executor whose probes are capped at `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Probe `url` once and classify the result.
    ///
    /// `response_time_ms` is wall-clock from send to classification,
    /// measured for failures as well.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let elapsed = start.elapsed().as_millis() as u64;
                let message = if e.is_timeout() {
                    format!("timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                };
                return ProbeOutcome::offline(message, elapsed, Utc::now());
            }
        };

        let status = response.status().as_u16();
        if status >= ONLINE_STATUS_CEILING {
            let elapsed = start.elapsed().as_millis() as u64;
            return ProbeOutcome::offline(
                format!("server error: HTTP {}", status),
                elapsed,
                Utc::now(),
            );
        }

        // Drain the body so the measurement covers the complete transfer.
        if let Err(e) = response.bytes().await {
            let elapsed = start.elapsed().as_millis() as u64;
            return ProbeOutcome::offline(e.to_string(), elapsed, Utc::now());
        }

        ProbeOutcome::online(status, start.elapsed().as_millis() as u64, Utc::now())
    }
}
