//=========================================================================
// Input Router
//=========================================================================
//
// Decides, once per frame, which single screen receives input.
//
// Architecture:
//   poll(batches) → StateTracker → InputSnapshot (de-duplicated)
//                                         │
//   ScreenManager::update ── FocusPass ───┴──> focused screen.handle_input()
//
// The router owns the device-facing state (tracker, keymap, window focus)
// and the results of the last focus pass (focused screen, cursor and
// virtual-stick visibility, gesture set). The per-frame traversal itself
// lives in `FocusPass`, driven top-down by the screen manager.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::event::InputEvent;
use super::gesture::GestureSet;
use super::keymap::Keymap;
use super::snapshot::InputSnapshot;
use super::state_tracker::StateTracker;
use crate::core::render::Viewport;
use crate::core::screen::{ScreenId, ScreenState, UpdateStatus};

//=== InputRouter =========================================================

#[derive(Debug)]
pub struct InputRouter {
    tracker: StateTracker,
    keymap: Keymap,
    snapshot: InputSnapshot,
    viewport: Viewport,

    window_focused: bool,
    focus_lost: bool,

    focused: Option<ScreenId>,
    cursor_visible: bool,
    virtual_stick: bool,
    gestures: GestureSet,
}

impl InputRouter {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            tracker: StateTracker::new(),
            keymap: Keymap::default(),
            snapshot: InputSnapshot::default(),
            viewport,
            window_focused: true,
            focus_lost: false,
            focused: None,
            cursor_visible: false,
            virtual_stick: false,
            gestures: GestureSet::empty(),
        }
    }

    //--- Polling ----------------------------------------------------------

    /// Consumes this frame's raw input batches and rebuilds the snapshot.
    pub fn poll(&mut self, batches: &[Vec<InputEvent>]) {
        self.tracker.clear();

        if std::mem::take(&mut self.focus_lost) {
            self.tracker.release_all();
        }

        for batch in batches {
            self.tracker.process_events(batch);
        }
        self.tracker.finalize_frame();

        self.snapshot = InputSnapshot::capture(&self.tracker, &self.keymap, self.viewport);
    }

    /// Records OS window focus. Losing it releases everything held on the
    /// next poll.
    pub fn set_window_focus(&mut self, focused: bool) {
        if self.window_focused && !focused {
            debug!("Window lost focus, releasing held input");
            self.focus_lost = true;
        }
        self.window_focused = focused;
    }

    pub fn window_focused(&self) -> bool {
        self.window_focused
    }

    //--- Focus Results ----------------------------------------------------

    /// Stores the outcome of a focus pass.
    pub(crate) fn set_focus(&mut self, focused: Option<ScreenId>, cursor: bool, virtual_stick: bool) {
        if focused != self.focused {
            trace!("Input focus: {:?} -> {:?}", self.focused, focused);
        }
        self.focused = focused;
        self.cursor_visible = cursor;
        self.virtual_stick = virtual_stick;
    }

    /// Screen that received input in the last update, if any.
    pub fn focused(&self) -> Option<ScreenId> {
        self.focused
    }

    /// Whether the focused screen asked for a visible cursor.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn virtual_stick_visible(&self) -> bool {
        self.virtual_stick
    }

    //--- Gestures ---------------------------------------------------------

    pub fn gestures(&self) -> GestureSet {
        self.gestures
    }

    /// Replaces the active gesture set; returns whether it changed.
    pub(crate) fn set_gestures(&mut self, gestures: GestureSet) -> bool {
        if gestures == self.gestures {
            return false;
        }
        debug!("Enabled gestures: {:?}", gestures);
        self.gestures = gestures;
        true
    }

    //--- Accessors --------------------------------------------------------

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

//=== FocusPass ===========================================================

/// Focus/cover bookkeeping for one top-down update traversal.
///
/// Feed every screen to [`observe`](Self::observe) after its update hook,
/// topmost first. [`status`](Self::status) yields the flags the next
/// (lower) screen should be updated with.
#[derive(Debug, Clone, Copy)]
pub struct FocusPass {
    other_has_focus: bool,
    covered: bool,
    focus: Option<ScreenId>,
}

impl FocusPass {
    /// Starts a pass. Without window focus nobody can claim input.
    pub fn new(game_has_focus: bool) -> Self {
        Self {
            other_has_focus: !game_has_focus,
            covered: false,
            focus: None,
        }
    }

    /// Flags for the next screen to update.
    pub fn status(&self) -> UpdateStatus {
        UpdateStatus {
            other_screen_has_focus: self.other_has_focus,
            covered_by_other_screen: self.covered,
        }
    }

    /// Records a screen's post-update state. Returns true if it claimed
    /// focus.
    pub fn observe(&mut self, id: ScreenId, state: ScreenState, is_popup: bool) -> bool {
        if !matches!(state, ScreenState::TransitionOn | ScreenState::Active) {
            return false;
        }

        let claimed = !self.other_has_focus;
        if claimed {
            self.focus = Some(id);
            self.other_has_focus = true;
        }
        if !is_popup {
            self.covered = true;
        }
        claimed
    }

    /// Screen that claimed focus during this pass.
    pub fn focus(&self) -> Option<ScreenId> {
        self.focus
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
