//! Caller-owned fall timer.
//!
//! The engine has no notion of time. `FallClock` accumulates elapsed
//! milliseconds reported by the host loop and hands out ticks at the
//! level-dependent interval.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallClock {
    elapsed_ms: u32,
}

impl FallClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time accumulated toward the next tick.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Drop accumulated time; the next tick is a full interval away.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    pub fn accumulate(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
    }

    /// Consume one interval if enough time has accumulated.
    pub fn take_tick(&mut self, interval_ms: u32) -> bool {
        let interval_ms = interval_ms.max(1);
        if self.elapsed_ms >= interval_ms {
            self.elapsed_ms -= interval_ms;
            true
        } else {
            false
        }
    }

    /// Milliseconds until the next tick at `interval_ms`.
    pub fn remaining_ms(&self, interval_ms: u32) -> u32 {
        interval_ms.saturating_sub(self.elapsed_ms)
    }
}
