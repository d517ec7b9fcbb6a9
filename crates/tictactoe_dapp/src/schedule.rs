//! Deferred actions fired in scheduling order.
//!
//! Stands in for browser timers: the owner schedules an action with a delay
//! and later drains whatever is due with [`Timeline::due`].

use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Pending actions keyed by due time.
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    entries: Vec<(Instant, u64, A)>,
    next_seq: u64,
}

impl<A: std::fmt::Debug> Timeline<A> {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedules `action` to fire `delay` after `now`.
    #[instrument(skip(self, now))]
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(delay_ms = delay.as_millis() as u64, seq, "Action scheduled");
        self.entries.push((now + delay, seq, action));
    }

    /// Removes and returns every action due at `now`, earliest first; ties
    /// keep scheduling order.
    pub fn due(&mut self, now: Instant) -> Vec<A> {
        let (mut ready, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|(at, _, _)| *at <= now);
        self.entries = pending;
        ready.sort_by_key(|(at, seq, _)| (*at, *seq));
        ready.into_iter().map(|(_, _, action)| action).collect()
    }

    /// Earliest due time, if anything is pending.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|(at, _, _)| *at).min()
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending action.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<A: std::fmt::Debug> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_fires_in_time_then_schedule_order() {
        let t0 = Instant::now();
        let mut timeline = Timeline::new();
        timeline.schedule(t0, Duration::from_secs(3), "refresh");
        timeline.schedule(t0, Duration::from_secs(1), "computer");
        timeline.schedule(t0, Duration::from_secs(1), "second");

        assert!(timeline.due(t0).is_empty());
        assert_eq!(timeline.due(t0 + Duration::from_secs(1)), vec!["computer", "second"]);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.next_due(), Some(t0 + Duration::from_secs(3)));
        assert_eq!(timeline.due(t0 + Duration::from_secs(10)), vec!["refresh"]);
        assert!(timeline.is_empty());
    }
}
