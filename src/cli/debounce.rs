//! Input coalescing for the browse screen
//!
//! Keystrokes push values; a value is released only once no newer value has
//! arrived for the quiet window. Callers pass `Instant`s in so the policy can
//! be driven by the event loop (and by tests) without sleeping.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending value; the quiet window restarts at `now`
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if the window has elapsed since the last push
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, at)) if now.saturating_duration_since(at) >= self.window => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// How long the event loop may block before the pending value is due
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.window.saturating_sub(now.saturating_duration_since(*at)))
    }

    /// Take the pending value immediately, ignoring the window
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    #[test]
    fn test_releases_after_quiet_window() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("a", start);

        assert_eq!(d.poll(start + Duration::from_millis(100)), None);
        assert_eq!(d.poll(start + WINDOW), Some("a"));
        assert_eq!(d.poll(start + WINDOW * 2), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_collapses_to_last_value() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("g", start);
        d.push("gr", start + Duration::from_millis(100));
        d.push("gro", start + Duration::from_millis(200));

        // Window restarted at the last push
        assert_eq!(d.poll(start + Duration::from_millis(300)), None);
        assert_eq!(d.poll(start + Duration::from_millis(350)), Some("gro"));
    }

    #[test]
    fn test_time_left() {
        let start = Instant::now();
        let mut d: Debouncer<u8> = Debouncer::new(WINDOW);
        assert_eq!(d.time_left(start), None);

        d.push(1, start);
        assert_eq!(d.time_left(start + Duration::from_millis(50)), Some(Duration::from_millis(100)));
        assert_eq!(d.time_left(start + Duration::from_secs(1)), Some(Duration::ZERO));
    }

    #[test]
    fn test_flush_and_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push(1, start);
        assert_eq!(d.flush(), Some(1));
        assert_eq!(d.flush(), None);

        d.push(2, start);
        d.cancel();
        assert_eq!(d.poll(start + WINDOW), None);
    }
}
