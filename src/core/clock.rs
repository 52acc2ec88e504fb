//=========================================================================
// Frame Clock
//=========================================================================
//
// Fixed-timestep clock driving the core thread.
//
// Every tick advances simulated time by exactly one step, regardless of
// how long the tick actually took. Transition progress is therefore a
// pure function of the tick count, which keeps the stack deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::trace;

//=== FrameTime ===========================================================

/// Time information handed to every screen hook for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Time since the previous frame.
    pub elapsed: Duration,

    /// Time since the clock started.
    pub total: Duration,
}

impl FrameTime {
    pub const ZERO: Self = Self {
        elapsed: Duration::ZERO,
        total: Duration::ZERO,
    };

    pub const fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    /// Convenience for a single step starting at zero.
    pub fn from_secs(elapsed: f32) -> Self {
        let elapsed = Duration::from_secs_f32(elapsed);
        Self::new(elapsed, elapsed)
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn total_secs(&self) -> f32 {
        self.total.as_secs_f32()
    }
}

//=== FrameClock ==========================================================

/// Fixed-step clock: one [`FrameTime`] per tick at the configured TPS.
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    total: Duration,
    ticks: u64,
}

impl FrameClock {
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn new(tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        Self {
            step: Duration::from_secs_f64(1.0 / tps),
            total: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances one step and returns the time of the new frame.
    pub fn advance(&mut self) -> FrameTime {
        self.total += self.step;
        self.ticks += 1;
        FrameTime::new(self.step, self.total)
    }

    /// Sleeps out the remainder of the step started at `frame_start`.
    pub fn pace(&self, frame_start: Instant) {
        let elapsed = frame_start.elapsed();
        if elapsed < self.step {
            thread::sleep(self.step - elapsed);
        } else {
            trace!("Tick {} overran by {:?}", self.ticks, elapsed - self.step);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
