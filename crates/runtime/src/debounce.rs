use std::time::Duration;

/// Trailing-edge debouncer driven by an external clock.
///
/// Timestamps are offsets from any fixed origin chosen by the caller. Each
/// `push` replaces the pending value and restarts the quiet period, so only
/// the last value of a burst is ever released.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Duration, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn push(&mut self, value: T, now: Duration) {
        self.pending = Some((now + self.quiet, value));
    }

    /// Drops the pending value, if any, and returns it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Releases the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let ready = matches!(&self.pending, Some((due, _)) if now >= *due);
        if ready { self.cancel() } else { None }
    }
}
