// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frame-driven timers.
//!
//! Nothing here sleeps or spawns: callers pass the current instant and the
//! engine polls the timers once per frame.

use std::time::{Duration, Instant};

/// Coalesces a burst of triggers into one firing `delay` after the last
/// trigger. A newer trigger supersedes the pending one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once the deadline has passed, and disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Lets at most one call through per `interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let ready = self
            .last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if ready {
            self.last = Some(now);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_trigger_supersedes_pending_one() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(75));
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(50));

        assert!(!debouncer.fire(start + Duration::from_millis(80)));
        assert!(debouncer.fire(start + Duration::from_millis(125)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_disarms() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.fire(start + Duration::from_secs(1)));
    }

    #[test]
    fn throttle_limits_rate() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(8));
        assert!(throttle.try_acquire(start));
        assert!(!throttle.try_acquire(start + Duration::from_millis(4)));
        assert!(throttle.try_acquire(start + Duration::from_millis(8)));
        throttle.reset();
        assert!(throttle.try_acquire(start + Duration::from_millis(9)));
    }
}
