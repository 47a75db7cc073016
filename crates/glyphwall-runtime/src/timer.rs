//! Purpose-keyed timer table polled by the frame loop
//!
//! Every timer a view owns lives in one table keyed by what it is for, so a
//! single `clear_all` cancels everything on a mode switch or teardown. Each
//! entry carries the token that was current when it was scheduled; handlers
//! compare it against the live token and drop stale fires.

/// A scheduled timer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerEntry {
    /// Timestamp (ms) at which the timer fires next
    pub due_ms: f64,
    /// Re-arm period for interval timers
    pub interval_ms: Option<f64>,
    /// Generation token captured at schedule time
    pub token: u64,
}

/// A timer that came due during `poll`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiredTimer<K> {
    pub purpose: K,
    pub token: u64,
    pub due_ms: f64,
}

/// Timer table with at most one timer per purpose.
///
/// Tables stay small (one slot per purpose), so entries live in a `Vec` and
/// fire order is deterministic: by due time, then by schedule order.
#[derive(Debug)]
pub struct TimerTable<K> {
    entries: Vec<(K, TimerEntry)>,
}

impl<K> Default for TimerTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> TimerTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer, replacing any timer with the same purpose
    pub fn schedule(&mut self, purpose: K, now_ms: f64, delay_ms: f64, token: u64) {
        self.insert(
            purpose,
            TimerEntry {
                due_ms: now_ms + delay_ms.max(0.0),
                interval_ms: None,
                token,
            },
        );
    }

    /// Schedule a repeating timer that first fires one period from now
    pub fn schedule_interval(&mut self, purpose: K, now_ms: f64, period_ms: f64, token: u64) {
        let period = period_ms.max(1.0);
        self.insert(
            purpose,
            TimerEntry {
                due_ms: now_ms + period,
                interval_ms: Some(period),
                token,
            },
        );
    }

    fn insert(&mut self, purpose: K, entry: TimerEntry) {
        self.cancel(purpose);
        self.entries.push((purpose, entry));
    }

    /// Cancel the timer for a purpose. Returns true if one was pending.
    pub fn cancel(&mut self, purpose: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(p, _)| *p != purpose);
        self.entries.len() != before
    }

    /// Cancel every pending timer, returning how many were dropped
    pub fn clear_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn is_pending(&self, purpose: K) -> bool {
        self.entries.iter().any(|(p, _)| *p == purpose)
    }

    pub fn get(&self, purpose: K) -> Option<&TimerEntry> {
        self.entries
            .iter()
            .find(|(p, _)| *p == purpose)
            .map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect every timer due at `now_ms`.
    ///
    /// One-shot timers are removed. Interval timers fire once per poll even if
    /// several periods were missed, then re-arm on their original cadence.
    pub fn poll(&mut self, now_ms: f64) -> Vec<FiredTimer<K>> {
        let mut fired = Vec::new();

        for (purpose, entry) in &mut self.entries {
            if entry.due_ms > now_ms {
                continue;
            }
            fired.push(FiredTimer {
                purpose: *purpose,
                token: entry.token,
                due_ms: entry.due_ms,
            });
            if let Some(period) = entry.interval_ms {
                while entry.due_ms <= now_ms {
                    entry.due_ms += period;
                }
            }
        }

        self.entries
            .retain(|(_, e)| e.interval_ms.is_some() || e.due_ms > now_ms);

        // Stable: ties keep schedule order
        fired.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Purpose {
        Arm,
        Revert,
        Follow,
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerTable::new();
        timers.schedule(Purpose::Arm, 0.0, 220.0, 1);

        assert!(timers.poll(219.0).is_empty());
        let fired = timers.poll(220.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].purpose, Purpose::Arm);
        assert_eq!(fired[0].token, 1);
        assert!(timers.poll(1000.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut timers = TimerTable::new();
        timers.schedule(Purpose::Arm, 0.0, 100.0, 1);
        timers.schedule(Purpose::Arm, 50.0, 100.0, 2);
        assert_eq!(timers.len(), 1);

        assert!(timers.poll(120.0).is_empty());
        let fired = timers.poll(150.0);
        assert_eq!(fired[0].token, 2);
    }

    #[test]
    fn test_cancel_and_clear_all() {
        let mut timers = TimerTable::new();
        timers.schedule(Purpose::Arm, 0.0, 100.0, 1);
        timers.schedule(Purpose::Revert, 0.0, 900.0, 1);
        timers.schedule_interval(Purpose::Follow, 0.0, 180.0, 1);

        assert!(timers.cancel(Purpose::Arm));
        assert!(!timers.cancel(Purpose::Arm));
        assert!(timers.is_pending(Purpose::Revert));

        assert_eq!(timers.clear_all(), 2);
        assert!(timers.poll(10_000.0).is_empty());
    }

    #[test]
    fn test_interval_rearms() {
        let mut timers = TimerTable::new();
        timers.schedule_interval(Purpose::Follow, 0.0, 100.0, 7);

        assert_eq!(timers.poll(100.0).len(), 1);
        assert_eq!(timers.get(Purpose::Follow).unwrap().due_ms, 200.0);

        // Missed periods collapse into a single fire
        assert_eq!(timers.poll(450.0).len(), 1);
        assert_eq!(timers.get(Purpose::Follow).unwrap().due_ms, 500.0);
        assert!(timers.is_pending(Purpose::Follow));
    }

    #[test]
    fn test_fire_order_by_due_time() {
        let mut timers = TimerTable::new();
        timers.schedule(Purpose::Revert, 0.0, 300.0, 1);
        timers.schedule(Purpose::Arm, 0.0, 200.0, 1);

        let fired = timers.poll(500.0);
        let order: Vec<_> = fired.iter().map(|f| f.purpose).collect();
        assert_eq!(order, vec![Purpose::Arm, Purpose::Revert]);
    }
}
