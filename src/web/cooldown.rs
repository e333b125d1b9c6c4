//! Per-command invocation cooldowns.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Expiring ledger of recent command invocations, keyed by
/// (command, tenant). A repeat invocation inside the window is rejected
/// with the remaining wait; entries expire on their own and are pruned as
/// the ledger is consulted.
pub struct CooldownLedger {
    window: Duration,
    entries: Mutex<HashMap<(String, String), Instant>>,
}

impl CooldownLedger {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Consult and arm the ledger in one step.
    ///
    /// Returns `Err(remaining)` when (command, tenant) is still cooling
    /// down; otherwise arms the entry and returns `Ok`.
    pub fn try_acquire(&self, command: &str, tenant: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        entries.retain(|_, expiry| *expiry > now);

        let key = (command.to_string(), tenant.to_string());
        if let Some(expiry) = entries.get(&key) {
            return Err(*expiry - now);
        }

        entries.insert(key, now + self.window);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_invocation_allowed() {
        let ledger = CooldownLedger::new(Duration::from_secs(3));
        assert!(ledger.try_acquire("add", "u1").is_ok());
    }

    #[test]
    fn test_repeat_within_window_rejected() {
        let ledger = CooldownLedger::new(Duration::from_secs(3));
        ledger.try_acquire("add", "u1").unwrap();

        let remaining = ledger.try_acquire("add", "u1").unwrap_err();
        assert!(remaining <= Duration::from_secs(3));
        assert!(remaining > Duration::ZERO);
    }

    #[test]
    fn test_commands_and_tenants_cool_down_independently() {
        let ledger = CooldownLedger::new(Duration::from_secs(3));
        ledger.try_acquire("add", "u1").unwrap();

        // Same tenant, different command; same command, different tenant.
        assert!(ledger.try_acquire("check", "u1").is_ok());
        assert!(ledger.try_acquire("add", "u2").is_ok());
    }

    #[test]
    fn test_entry_expires_after_window() {
        let ledger = CooldownLedger::new(Duration::from_millis(20));
        ledger.try_acquire("add", "u1").unwrap();

        std::thread::sleep(Duration::from_millis(40));
        assert!(ledger.try_acquire("add", "u1").is_ok());
    }

    #[test]
    fn test_zero_window_never_blocks() {
        let ledger = CooldownLedger::new(Duration::ZERO);
        ledger.try_acquire("add", "u1").unwrap();
        assert!(ledger.try_acquire("add", "u1").is_ok());
    }
}
