//! Bounded probe history.
//!
//! A fixed-capacity ring: appends are O(1) and once the buffer is full each
//! append overwrites the oldest entry in place.

use super::models::ProbeOutcome;

/// Fixed-capacity FIFO buffer of the most recent probe outcomes for one
/// target. Entries are kept in chronological append order; the oldest entry
/// is evicted first when the capacity is exceeded.
#[derive(Debug)]
pub struct HistoryBuffer {
    slots: Vec<ProbeOutcome>,
    capacity: usize,
    /// Index of the slot the next append writes to, once `slots` is full.
    write: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding up to `capacity` outcomes.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            write: 0,
        }
    }

    /// Append an outcome, evicting the oldest entry if the buffer is full.
    pub fn append(&mut self, outcome: ProbeOutcome) {
        if self.slots.len() < self.capacity {
            self.slots.push(outcome);
        } else {
            self.slots[self.write] = outcome;
            self.write = (self.write + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Up to `limit` most recent outcomes, most recent first. `limit` is
    /// clamped to `[1, capacity]`; an empty buffer yields an empty vec.
    pub fn recent(&self, limit: usize) -> Vec<ProbeOutcome> {
        let limit = limit.clamp(1, self.capacity).min(self.slots.len());
        if limit == 0 {
            return Vec::new();
        }

        // `write` is the oldest slot once full, so the newest entry sits just
        // behind it; before wrap-around the newest is the last push.
        let newest = if self.slots.len() < self.capacity {
            self.slots.len() - 1
        } else {
            (self.write + self.capacity - 1) % self.capacity
        };

        let mut out = Vec::with_capacity(limit);
        for i in 0..limit {
            let idx = (newest + self.capacity - i) % self.capacity;
            out.push(self.slots[idx].clone());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn outcome(seq: u64) -> ProbeOutcome {
        // Encode the sequence number in response_time_ms so order is visible.
        ProbeOutcome::online(200, seq, Utc::now() + Duration::milliseconds(seq as i64))
    }

    #[test]
    fn test_empty_recent_is_empty() {
        let buf = HistoryBuffer::new(50);
        assert!(buf.is_empty());
        assert!(buf.recent(10).is_empty());
    }

    #[test]
    fn test_append_below_capacity() {
        let mut buf = HistoryBuffer::new(5);
        for seq in 0..3 {
            buf.append(outcome(seq));
        }
        assert_eq!(buf.len(), 3);

        let recent = buf.recent(10);
        let seqs: Vec<u64> = recent.iter().map(|o| o.response_time_ms).collect();
        assert_eq!(seqs, vec![2, 1, 0]);
    }

    #[test]
    fn test_eviction_keeps_last_capacity_entries() {
        let mut buf = HistoryBuffer::new(5);
        // 5 + 3 appends: the first 3 must have been evicted.
        for seq in 0..8 {
            buf.append(outcome(seq));
        }
        assert_eq!(buf.len(), 5);

        let mut chrono_order: Vec<u64> =
            buf.recent(5).iter().map(|o| o.response_time_ms).collect();
        chrono_order.reverse();
        assert_eq!(chrono_order, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut buf = HistoryBuffer::new(50);
        for seq in 0..137 {
            buf.append(outcome(seq));
            assert!(buf.len() <= 50);
        }
        assert_eq!(buf.len(), 50);
    }

    #[test]
    fn test_recent_limit_clamped() {
        let mut buf = HistoryBuffer::new(5);
        for seq in 0..5 {
            buf.append(outcome(seq));
        }

        // A zero limit still returns the single most recent entry.
        let one = buf.recent(0);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].response_time_ms, 4);

        // A limit past capacity is capped at capacity.
        assert_eq!(buf.recent(1000).len(), 5);
    }

    #[test]
    fn test_recent_order_after_wraparound() {
        let mut buf = HistoryBuffer::new(3);
        for seq in 0..7 {
            buf.append(outcome(seq));
        }

        let seqs: Vec<u64> = buf.recent(3).iter().map(|o| o.response_time_ms).collect();
        assert_eq!(seqs, vec![6, 5, 4]);
    }
}
