//! Reload debouncing.
//!
//! Coalesces bursts of filesystem events into a single reload. The debouncer
//! is a two-state machine owned by the watcher's drive task: idle (no
//! deadline) and pending (deadline set). Scheduling while pending cancels and
//! replaces the previous deadline, so only a quiet period of the full window
//! lets a reload fire.

use tokio::time::{Duration, Instant};

/// Debounce state for pending reload broadcasts.
///
/// At most one reload is pending at any time.
#[derive(Debug)]
pub(crate) struct ReloadDebouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl ReloadDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Schedule (or reschedule) the pending reload at `now + window`.
    pub(crate) fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Deadline of the pending reload, if one is scheduled.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Clear the pending reload. Returns `true` if one was pending.
    pub(crate) fn fire(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_starts_idle() {
        let debouncer = ReloadDebouncer::new(Duration::from_millis(100));
        assert_eq!(debouncer.deadline(), None);
    }

    #[tokio::test]
    async fn test_schedule_sets_deadline_one_window_out() {
        let mut debouncer = ReloadDebouncer::new(Duration::from_millis(100));
        let now = Instant::now();

        debouncer.schedule(now);

        assert_eq!(debouncer.deadline(), Some(now + Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_reschedule_replaces_deadline() {
        let mut debouncer = ReloadDebouncer::new(Duration::from_millis(100));
        let now = Instant::now();

        debouncer.schedule(now);
        let later = now + Duration::from_millis(40);
        debouncer.schedule(later);

        // The earlier deadline is cancelled, not stacked.
        assert_eq!(
            debouncer.deadline(),
            Some(later + Duration::from_millis(100))
        );
    }

    #[tokio::test]
    async fn test_fire_clears_pending_state() {
        let mut debouncer = ReloadDebouncer::new(Duration::from_millis(100));
        debouncer.schedule(Instant::now());

        assert!(debouncer.fire());
        assert_eq!(debouncer.deadline(), None);
        assert!(!debouncer.fire());
    }
}
