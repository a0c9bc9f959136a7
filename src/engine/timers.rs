use std::time::Instant;

use crate::models::NotificationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Reconnect,
    Heartbeat,
    UptimeRefresh,
    NotificationExpiry(NotificationId),
}

#[derive(Debug)]
struct PendingTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due: Instant,
}

/// Fire-once timers driven by the engine's pump. Every timer can be cancelled
/// through its handle, so a teardown or manual reconnect never sees stale callbacks.
#[derive(Debug, Default)]
pub struct TimerSet {
    next: u64,
    pending: Vec<PendingTimer>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due: Instant) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.pending.push(PendingTimer { handle, kind, due });
        handle
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Removes and returns every timer due at `now`, earliest first.
    /// Ties keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerHandle, TimerKind)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = rest;
        due.sort_by_key(|t| (t.due, t.handle));
        due.into_iter().map(|t| (t.handle, t.kind)).collect()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|t| t.due).min()
    }

    pub fn due_of(&self, handle: TimerHandle) -> Option<Instant> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
