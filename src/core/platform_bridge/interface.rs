//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages and errors crossing the platform ⇄ core thread boundary.
//
//   platform → core   PlatformEvent   (input batches, focus, close)
//   core → platform   CoreEvent       (frames, cursor visibility, shutdown)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;
use crate::core::render::Frame;

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Batched input events for a frame.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// OS window gained or lost keyboard focus.
    Focused(bool),

    /// Window close requested.
    WindowClosed,
}

//=== CoreEvent ===========================================================

/// Events sent from core back to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CoreEvent {
    /// The back buffer after this tick's draw.
    Present(Frame),

    /// The focused screen wants the OS cursor shown (or hidden).
    CursorVisible(bool),

    /// The screen stack drained after an exit request.
    Shutdown,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}
