//=========================================================================
// Screen Transition
//=========================================================================
//
// Per-screen transition state machine.
//
// States:
//   TransitionOn ──position→0──> Active
//        ^                         │ covered
//        │ uncovered               v
//      Hidden <──position→1── TransitionOff ──(exiting)──> finished
//
// `position` runs from 1 (fully off) to 0 (fully on). Each frame it moves
// by `elapsed / duration` toward the current target and is clamped; a zero
// duration completes the move in a single frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::ScreenState;

//=== Outcome =============================================================

/// Result of advancing a transition by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,

    /// An exiting screen reached position 1 and must be removed.
    Finished,
}

//=== Transition ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    state: ScreenState,
    position: f32,
    on_time: Duration,
    off_time: Duration,
    exiting: bool,
}

impl Transition {
    /// A fresh transition: entering from fully off, or already `Active`
    /// when `on_time` is zero.
    pub fn new(on_time: Duration, off_time: Duration) -> Self {
        let (state, position) = if on_time.is_zero() {
            (ScreenState::Active, 0.0)
        } else {
            (ScreenState::TransitionOn, 1.0)
        };

        Self {
            state,
            position,
            on_time,
            off_time,
            exiting: false,
        }
    }

    //--- Per-frame --------------------------------------------------------

    pub fn advance(&mut self, elapsed: Duration, covered: bool) -> Outcome {
        if self.exiting {
            self.state = ScreenState::TransitionOff;
            if !self.step(elapsed, self.off_time, 1.0) {
                return Outcome::Finished;
            }
        } else if covered {
            self.state = if self.step(elapsed, self.off_time, 1.0) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
        } else {
            self.state = if self.step(elapsed, self.on_time, -1.0) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
        }
        Outcome::Running
    }

    /// Moves the position; returns true while the target is not reached.
    fn step(&mut self, elapsed: Duration, duration: Duration, direction: f32) -> bool {
        let delta = if duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / duration.as_secs_f32()
        };

        self.position += delta * direction;

        if (direction < 0.0 && self.position <= 0.0) || (direction > 0.0 && self.position >= 1.0) {
            self.position = self.position.clamp(0.0, 1.0);
            return false;
        }
        true
    }

    /// Starts leaving. Takes effect immediately so the screen stops
    /// competing for focus this frame.
    pub fn begin_exit(&mut self) {
        self.exiting = true;
        self.state = ScreenState::TransitionOff;
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> ScreenState {
        self.state
    }

    /// 0 = fully on, 1 = fully off.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Linear fade alpha, `1 - position`.
    pub fn alpha(&self) -> f32 {
        1.0 - self.position
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    pub fn on_time(&self) -> Duration {
        self.on_time
    }

    pub fn off_time(&self) -> Duration {
        self.off_time
    }

    /// Forces the fully-on state (used to render previews).
    pub(crate) fn force_active(&mut self) {
        self.state = ScreenState::Active;
        self.position = 0.0;
        self.exiting = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
