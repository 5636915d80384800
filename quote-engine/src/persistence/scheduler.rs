//! Cancellable deferred task
//!
//! Holds at most one pending payload with its deadline. Scheduling again
//! replaces the pending one, so only the latest payload ever fires.

#[derive(Debug, Clone)]
pub struct Deferred<T> {
    pending: Option<(i64, T)>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` for `due_at`; returns true if it replaced a pending one
    pub fn schedule(&mut self, due_at: i64, payload: T) -> bool {
        self.pending.replace((due_at, payload)).is_some()
    }

    /// Drop the pending payload, returning it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn deadline(&self) -> Option<i64> {
        self.pending.as_ref().map(|(due_at, _)| *due_at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the payload if its deadline has passed
    pub fn take_due(&mut self, now: i64) -> Option<T> {
        match self.pending {
            Some((due_at, _)) if due_at <= now => self.cancel(),
            _ => None,
        }
    }
}
