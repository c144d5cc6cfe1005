//=========================================================================
// Clock
//=========================================================================
//
// Monotonic millisecond time source consumed by timers and the frame
// driver.
//
// `SystemClock` counts from its own creation. `ManualClock` is advanced
// explicitly and can be shared (it is `Clone` over an `Rc`), which keeps
// timer and scene tests deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

//=== Clock Trait =========================================================

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds elapsed since the clock's epoch.
    fn ticks(&self) -> u64;
}

//=== SystemClock =========================================================

/// Wall clock backed by [`Instant`], epoch at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
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
    fn ticks(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

//=== ManualClock =========================================================

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jumps to an absolute time.
    pub fn set(&self, ticks: u64) {
        self.now.set(ticks);
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn ticks(&self) -> u64 {
        self.now.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(10);
        let shared = clock.clone();

        clock.advance(5);
        assert_eq!(shared.ticks(), 15);

        shared.set(100);
        assert_eq!(clock.ticks(), 100);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.ticks();
        let b = clock.ticks();
        assert!(b >= a);
    }
}
