//! Cancellable delayed-event scheduler.
//!
//! The engine needs two kinds of timers: the 15-second grace period
//! before an empty room is deleted, and the reveal-phase readiness
//! timeout. Both must be cancellable, and cancellation must be safe to
//! call redundantly (a timer that already fired, or was never armed).
//!
//! Rather than handing raw task handles around, callers talk to a
//! [`Scheduler`]: `schedule(delay, event)` returns a [`TimerKey`], and
//! `cancel(key)` revokes it. Fired events are delivered as plain values
//! into whatever channel the process's single event loop consumes, so a
//! timer callback goes through exactly the same serialized path as an
//! inbound client action.
//!
//! Two implementations:
//!
//! - [`TokioScheduler`] — real timers; one sleeping task per entry,
//!   delivering into an `mpsc::UnboundedSender<E>`.
//! - [`ManualScheduler`] — a test double that records pending entries
//!   and lets tests fire them explicitly, no wall-clock waits.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

// ---------------------------------------------------------------------------
// TimerKey
// ---------------------------------------------------------------------------

/// Opaque handle to a scheduled timer. Keys are unique per scheduler
/// instance and never reused, so a stale key cancels nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey(u64);

// ---------------------------------------------------------------------------
// Scheduler trait
// ---------------------------------------------------------------------------

/// Schedules delayed events of type `E`.
///
/// Implementations must make `cancel` idempotent: cancelling an unknown,
/// already-fired, or already-cancelled key is a no-op returning `false`.
pub trait Scheduler<E>: Send {
    /// Arms a timer that delivers `event` after `delay`.
    fn schedule(&mut self, delay: Duration, event: E) -> TimerKey;

    /// Revokes a pending timer. Returns `true` if the timer was still
    /// pending, `false` otherwise.
    fn cancel(&mut self, key: TimerKey) -> bool;
}

// ---------------------------------------------------------------------------
// TokioScheduler
// ---------------------------------------------------------------------------

/// Production scheduler: one Tokio task per pending timer.
///
/// Fired events are pushed into the `mpsc` sink handed to [`new`]
/// (`TokioScheduler::new`); the event loop owns the receiving half. If
/// the receiver is gone the event is dropped silently — the process is
/// shutting down anyway.
pub struct TokioScheduler<E> {
    sink: mpsc::UnboundedSender<E>,
    tasks: HashMap<u64, JoinHandle<()>>,
    next_key: u64,
}

impl<E: Send + 'static> TokioScheduler<E> {
    /// Creates a scheduler delivering fired events into `sink`.
    pub fn new(sink: mpsc::UnboundedSender<E>) -> Self {
        Self {
            sink,
            tasks: HashMap::new(),
            next_key: 1,
        }
    }

    /// Number of timers that have been armed and not yet cancelled.
    ///
    /// Fired timers are lazily reaped, so this is an upper bound.
    pub fn pending_upper_bound(&self) -> usize {
        self.tasks.len()
    }

    /// Drops bookkeeping for tasks that have already completed.
    pub fn reap_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl<E: Send + 'static> Scheduler<E> for TokioScheduler<E> {
    fn schedule(&mut self, delay: Duration, event: E) -> TimerKey {
        let key = self.next_key;
        self.next_key += 1;

        let sink = self.sink.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sink.send(event);
        });

        self.tasks.insert(key, handle);
        trace!(key, delay_ms = delay.as_millis() as u64, "timer armed");
        TimerKey(key)
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        match self.tasks.remove(&key.0) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                trace!(key = key.0, was_pending, "timer cancelled");
                was_pending
            }
            None => false,
        }
    }
}

impl<E> Drop for TokioScheduler<E> {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

/// Test scheduler: records pending timers, fires only on demand.
///
/// Lets tests drive grace periods and timeouts without waiting:
///
/// ```
/// use std::time::Duration;
/// use wordmole_timer::{ManualScheduler, Scheduler};
///
/// let mut sched = ManualScheduler::new();
/// let key = sched.schedule(Duration::from_secs(15), "expired");
/// assert_eq!(sched.fire(key), Some("expired"));
/// assert_eq!(sched.fire(key), None); // already fired
/// ```
pub struct ManualScheduler<E> {
    pending: HashMap<u64, (Duration, E)>,
    next_key: u64,
}

impl<E> ManualScheduler<E> {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_key: 1,
        }
    }

    /// Fires a pending timer, returning its event. `None` if the key was
    /// cancelled, already fired, or never existed.
    pub fn fire(&mut self, key: TimerKey) -> Option<E> {
        self.pending.remove(&key.0).map(|(_, event)| event)
    }

    /// Fires every pending timer in arming order, returning the events.
    pub fn fire_all(&mut self) -> Vec<E> {
        let mut keys: Vec<u64> = self.pending.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|(_, e)| e))
            .collect()
    }

    /// Number of armed, unfired, uncancelled timers.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// The delay a pending timer was armed with.
    pub fn delay_of(&self, key: TimerKey) -> Option<Duration> {
        self.pending.get(&key.0).map(|(d, _)| *d)
    }
}

impl<E> Default for ManualScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send> Scheduler<E> for ManualScheduler<E> {
    fn schedule(&mut self, delay: Duration, event: E) -> TimerKey {
        let key = self.next_key;
        self.next_key += 1;
        self.pending.insert(key, (delay, event));
        TimerKey(key)
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        self.pending.remove(&key.0).is_some()
    }
}

// =========================================================================
// Tests
// =========================================================================
