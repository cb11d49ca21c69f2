//! One-shot timers for a single-threaded event loop.
//!
//! The queue never spawns threads and never reads the clock itself: callers
//! pass the current instant into [`TimerQueue::schedule`] and
//! [`TimerQueue::fire_due`], which keeps timer behavior fully deterministic
//! under test. Repeating timers are expressed by re-scheduling from the
//! fired callback, so cancellation is always a plain [`TimerQueue::cancel`].

use std::time::{Duration, Instant};

/// Handle to a scheduled timer. Tokens are unique for the lifetime of the
/// queue and are never reused, so a stale token simply fails to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

struct Entry<T> {
    deadline: Instant,
    token: TimerToken,
    payload: T,
}

/// A deadline-ordered set of pending one-shot timers.
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_token: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_token: 0,
        }
    }

    /// Schedule `payload` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Entry {
            deadline: now + delay,
            token,
            payload,
        });
        tracing::trace!(?token, ?delay, pending = self.entries.len(), "timer scheduled");
        token
    }

    /// Cancel a pending timer, returning its payload if it was still queued.
    pub fn cancel(&mut self, token: TimerToken) -> Option<T> {
        let i = self.entries.iter().position(|e| e.token == token)?;
        tracing::trace!(?token, "timer cancelled");
        Some(self.entries.swap_remove(i).payload)
    }

    pub fn is_scheduled(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// in deadline order (ties broken by scheduling order).
    pub fn fire_due(&mut self, now: Instant) -> Vec<(TimerToken, T)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now {
                let e = self.entries.swap_remove(i);
                due.push(e);
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.token.0.cmp(&b.token.0)));
        due.into_iter().map(|e| (e.token, e.payload)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_order_and_removal() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let a = q.schedule(t0, Duration::from_millis(50), "a");
        let b = q.schedule(t0, Duration::from_millis(20), "b");
        assert_eq!(q.len(), 2);

        let fired = q.fire_due(t0 + Duration::from_millis(30));
        assert_eq!(fired, vec![(b, "b")]);
        assert!(!q.is_scheduled(b));
        assert!(q.is_scheduled(a));

        let fired = q.fire_due(t0 + Duration::from_millis(60));
        assert_eq!(fired, vec![(a, "a")]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_due_sorted_by_deadline() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let late = q.schedule(t0, Duration::from_millis(40), 1);
        let early = q.schedule(t0, Duration::from_millis(10), 2);
        let fired = q.fire_due(t0 + Duration::from_millis(100));
        assert_eq!(fired[0].0, early);
        assert_eq!(fired[1].0, late);
    }

    #[test]
    fn test_cancel_returns_payload_once() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let t = q.schedule(t0, Duration::from_millis(10), 7);
        assert_eq!(q.cancel(t), Some(7));
        assert_eq!(q.cancel(t), None);
        assert!(q.fire_due(t0 + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_tokens_not_reused() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let a = q.schedule(t0, Duration::from_millis(1), ());
        q.cancel(a);
        let b = q.schedule(t0, Duration::from_millis(1), ());
        assert_ne!(a, b);
    }
}
