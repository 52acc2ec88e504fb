//=========================================================================
// Input System
//=========================================================================
//
// Device input as the screen stack sees it.
//
// Architecture:
//   InputEvent batches ──> InputRouter
//                            ├─ StateTracker  (held state, frame edges)
//                            ├─ Keymap        (presses → MenuAction)
//                            ├─ InputSnapshot (what handle_input receives)
//                            └─ FocusPass     (which screen receives it)
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod gesture;
mod keymap;
mod router;
mod snapshot;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton, Trigger};
pub use gesture::GestureSet;
pub use keymap::{Keymap, MenuAction};
pub use router::{FocusPass, InputRouter};
pub use snapshot::InputSnapshot;
pub use state_tracker::StateTracker;
