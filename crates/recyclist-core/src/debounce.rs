#![forbid(unsafe_code)]

//! Quiescence-based rate limiting for high-frequency host signals.
//!
//! Dragging or zooming a map produces a flood of extent changes. Issuing a
//! page query for each of them would waste the data provider and reset the
//! list repeatedly. [`Debouncer`] holds the most recent value and releases it
//! only after the signal has been quiet for the configured period.
//!
//! # Design
//!
//! - **Latest wins**: a push replaces any pending value and restarts the
//!   quiet period.
//! - **Host-driven time**: callers pass `now` explicitly, so identical event
//!   sequences yield identical decisions and tests never sleep.
//! - **Fires once**: a released value is consumed; `poll` returns `None`
//!   until the next push.
//!
//! # Usage
//!
//! ```
//! use recyclist_core::debounce::Debouncer;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut debouncer = Debouncer::new(Duration::from_millis(200));
//!
//! debouncer.push("first", start);
//! debouncer.push("second", start + Duration::from_millis(50));
//!
//! // Still inside the quiet period of the second push.
//! assert_eq!(debouncer.poll(start + Duration::from_millis(200)), None);
//!
//! // 200ms after the last push: the latest value is released.
//! assert_eq!(debouncer.poll(start + Duration::from_millis(250)), Some("second"));
//! assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
//! ```

use std::time::{Duration, Instant};

/// Default quiet period before a pending value is released.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(200);

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier).unwrap_or(Duration::ZERO)
}

/// Latest-wins debouncer.
///
/// # Thread Safety
///
/// Not synchronized; drive it from the same loop that dispatches the signal.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiescence: Duration,
    pending: Option<T>,
    last_push: Option<Instant>,
    /// Values replaced before they could fire (diagnostic).
    coalesced: u64,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIESCENCE)
    }
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(quiescence: Duration) -> Self {
        Self {
            quiescence,
            pending: None,
            last_push: None,
            coalesced: 0,
        }
    }

    /// The configured quiet period.
    #[inline]
    #[must_use]
    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    /// Record a new value, replacing any pending one and restarting the
    /// quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        if self.pending.replace(value).is_some() {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        self.last_push = Some(now);
    }

    /// Release the pending value if the signal has been quiet long enough.
    ///
    /// A zero quiet period releases on the first poll after a push.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let last = self.last_push?;
        if duration_since_or_zero(now, last) < self.quiescence {
            return None;
        }
        self.last_push = None;
        self.pending.take()
    }

    /// Time remaining until the pending value fires, if any.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_push?;
        Some(
            self.quiescence
                .saturating_sub(duration_since_or_zero(now, last)),
        )
    }

    /// Release the pending value immediately, regardless of timing.
    pub fn flush(&mut self) -> Option<T> {
        self.last_push = None;
        self.pending.take()
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.last_push = None;
        self.pending = None;
    }

    /// Whether a value is waiting for its quiet period to elapse.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of values superseded by a later push before firing.
    #[inline]
    #[must_use]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn poll_without_push_is_none() {
        let mut d: Debouncer<u32> = Debouncer::default();
        assert_eq!(d.poll(Instant::now()), None);
        assert!(!d.is_pending());
        assert_eq!(d.quiescence(), DEFAULT_QUIESCENCE);
    }

    #[test]
    fn fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(200));
        d.push(1, t0);
        assert_eq!(d.poll(t0 + ms(199)), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(t0 + ms(200)), Some(1));
        assert!(!d.is_pending());
    }

    #[test]
    fn push_restarts_quiet_period_and_latest_wins() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(200));
        d.push(1, t0);
        d.push(2, t0 + ms(150));
        d.push(3, t0 + ms(300));
        assert_eq!(d.poll(t0 + ms(400)), None);
        assert_eq!(d.poll(t0 + ms(500)), Some(3));
        assert_eq!(d.coalesced_count(), 2);
    }

    #[test]
    fn fires_only_once() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(10));
        d.push("a", t0);
        assert_eq!(d.poll(t0 + ms(10)), Some("a"));
        assert_eq!(d.poll(t0 + ms(20)), None);
    }

    #[test]
    fn zero_quiescence_fires_on_next_poll() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.push(7, t0);
        assert_eq!(d.poll(t0), Some(7));
    }

    #[test]
    fn clock_going_backwards_does_not_fire_early() {
        let t0 = Instant::now() + ms(1_000);
        let mut d = Debouncer::new(ms(200));
        d.push(1, t0);
        assert_eq!(d.poll(t0 - ms(500)), None);
        assert_eq!(d.remaining(t0 - ms(500)), Some(ms(200)));
    }

    #[test]
    fn remaining_counts_down() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(200));
        assert_eq!(d.remaining(t0), None);
        d.push((), t0);
        assert_eq!(d.remaining(t0 + ms(50)), Some(ms(150)));
        assert_eq!(d.remaining(t0 + ms(500)), Some(Duration::ZERO));
    }

    #[test]
    fn flush_and_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(200));
        d.push(5, t0);
        assert_eq!(d.flush(), Some(5));
        assert_eq!(d.poll(t0 + ms(300)), None);

        d.push(6, t0);
        d.cancel();
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + ms(300)), None);
    }
}
