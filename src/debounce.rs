//! Value settling.
//!
//! Pure debouncer: only handles timing, no business logic. Every `push`
//! replaces the pending value and restarts the quiet period; the value is
//! released once nothing new arrived for the full delay.
//!
//! Drive it from an event loop:
//!
//! ```ignore
//! tokio::select! {
//!     Some(msg) = rx.recv() => debouncer.push(msg.value),
//!     _ = sleep(debouncer.sleep_duration()), if debouncer.is_pending() => {
//!         if let Some(value) = debouncer.take_if_ready() { apply(value) }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::Instant;

/// Sleep used when nothing is pending.
const IDLE_SLEEP: Duration = Duration::from_secs(86400);

pub struct Debouncer<T> {
    delay: Duration,
    /// Latest input and when it arrived
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// A debouncer with no value; nothing is emitted until the first push.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now()));
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Value waiting for the quiet period to end.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= self.delay)
    }

    /// Precise sleep duration until the pending value can settle.
    pub fn sleep_duration(&self) -> Duration {
        let Some((_, at)) = &self.pending else {
            return IDLE_SLEEP;
        };
        self.delay.saturating_sub(at.elapsed())
    }

    /// Release the pending value if it has been quiet for the full delay.
    pub fn take_if_ready(&mut self) -> Option<T> {
        if !self.is_ready() {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }
}
