//! Time sources for acquisition stamping.
//!
//! The pool stamps every acquisition with a [`Tick`] and orders forced
//! recycling by it, so the clock only has to be monotonic; wall-clock
//! meaning is irrelevant.

use std::time::Instant;

/// Monotonic timestamp used to stamp acquisitions.
pub type Tick = u64;

/// Monotonic time source consulted on every acquisition.
pub trait Clock {
    /// Current timestamp. Must be non-decreasing across calls.
    fn now(&mut self) -> Tick;
}

/// Logical clock that advances by one on every call.
///
/// The default clock: deterministic and collision-free, which keeps
/// recycling order reproducible in tests.
#[derive(Debug, Default)]
pub struct TickClock {
    current: Tick,
}

impl TickClock {
    /// Create a clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for TickClock {
    fn now(&mut self) -> Tick {
        let tick = self.current;
        self.current += 1;
        tick
    }
}

/// Wall-clock-backed source: microseconds elapsed since construction.
///
/// Ties are possible under this clock; the registry's deterministic
/// iteration order (ascending handle id) breaks them.
#[derive(Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock with its epoch at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Tick {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(Tick::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_clock_is_strictly_increasing() {
        let mut clock = TickClock::new();
        let a = clock.now();
        let b = clock.now();
        let c = clock.now();
        assert!(a < b && b < c);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
