//! Wall-clock second ticker.
//!
//! The main loop runs at display rate; the round engine wants one logical
//! tick per second.  `SecondTicker` bridges the two: each `poll` reports
//! how many whole seconds have elapsed since the last accounting and moves
//! its base forward by exactly that much, so fractional seconds carry over
//! instead of drifting.

use std::time::{Duration, Instant};

/// Converts elapsed wall clock into due one-second ticks.
///
/// Exactly one ticker drives the engine; `restart` is called on every phase
/// entry so no accumulated time leaks from the previous phase.
#[derive(Debug)]
pub struct SecondTicker {
    base: Instant,
}

impl SecondTicker {
    pub fn start() -> Self {
        SecondTicker { base: Instant::now() }
    }

    /// Drop any accumulated time (phase entry / cadence cancel).
    pub fn restart(&mut self) {
        self.base = Instant::now();
    }

    /// Number of whole seconds due since the previous poll.
    pub fn poll(&mut self) -> u32 {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.base);
        let due = elapsed.as_secs() as u32;
        if due > 0 {
            self.base += Duration::from_secs(u64::from(due));
        }
        due
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ticker_owes_nothing() {
        let mut t = SecondTicker::start();
        assert_eq!(t.poll(), 0);
    }

    #[test]
    fn whole_seconds_are_counted() {
        let mut t = SecondTicker::start();
        let later = t.base + Duration::from_millis(2500);
        assert_eq!(t.poll_at(later), 2);
    }

    #[test]
    fn fraction_carries_to_next_poll() {
        let mut t = SecondTicker::start();
        let start = t.base;
        assert_eq!(t.poll_at(start + Duration::from_millis(1700)), 1);
        // The leftover 0.7 s plus 0.4 s more crosses the next boundary.
        assert_eq!(t.poll_at(start + Duration::from_millis(2100)), 1);
        assert_eq!(t.poll_at(start + Duration::from_millis(2900)), 0);
    }

    #[test]
    fn restart_cancels_accumulated_time() {
        let mut t = SecondTicker::start();
        // Backdate the base so several seconds are owed, then cancel them.
        t.base -= Duration::from_secs(5);
        t.restart();
        assert_eq!(t.poll(), 0);
    }
}
