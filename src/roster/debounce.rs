//! Single-slot debounce timer driven by an external clock.

use std::time::{Duration, Instant};

/// Holds the latest input until it has been quiet for `delay`.
///
/// Each `push` replaces the pending value and restarts the timer, so only the
/// value that outlives the delay is ever released.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

#[derive(Debug, Clone)]
struct Pending {
    value: String,
    due: Instant,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record new input, cancelling whatever was pending.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            value: value.into(),
            due: now + self.delay,
        });
    }

    /// Release the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Time left before the pending value is released.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.due.saturating_duration_since(now))
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_releases_after_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.push("Alice", t0);

        assert_eq!(debouncer.poll(t0 + ms(499)), None);
        assert_eq!(debouncer.poll(t0 + ms(500)), Some("Alice".to_string()));
        assert_eq!(debouncer.poll(t0 + ms(900)), None);
    }

    #[test]
    fn test_typing_releases_only_final_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let mut released = Vec::new();

        // One keystroke every 120ms, polled every 10ms like a UI frame loop
        let keystrokes = ["A", "Al", "Ali", "Alic", "Alice"];
        for (i, value) in keystrokes.iter().enumerate() {
            let at = t0 + ms(120 * i as u64);
            debouncer.push(*value, at);
            for tick in 0..12 {
                released.extend(debouncer.poll(at + ms(tick * 10)));
            }
        }
        for tick in 0..100 {
            released.extend(debouncer.poll(t0 + ms(480 + tick * 10)));
        }

        assert_eq!(released, vec!["Alice".to_string()]);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.push("Bob", t0);
        debouncer.cancel();

        assert_eq!(debouncer.remaining(t0), None);
        assert_eq!(debouncer.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn test_remaining_counts_down() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.remaining(t0), None);

        debouncer.push("x", t0);
        assert_eq!(debouncer.remaining(t0 + ms(200)), Some(ms(300)));
        assert_eq!(debouncer.remaining(t0 + ms(800)), Some(Duration::ZERO));
    }
}
