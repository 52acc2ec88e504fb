//=========================================================================
// State Tracker
//=========================================================================
//
// Per-frame input bookkeeping with held state and edge detection.
//
// Architecture:
//   InputEvent → process_events() → held set + frame edges → query
//
// Frame lifecycle: clear() → process_events() → finalize_frame() → query
//
// Keys and mouse buttons share one representation (`Trigger`) so menu
// bindings and edge queries treat them uniformly.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, Modifiers, Trigger};

//=== StateTracker ========================================================

/// Tracks held triggers across frames and press/release edges per frame.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent ------------------------------------------------------
    held: HashSet<Trigger>,
    cursor: Option<(f32, f32)>,
    modifiers: Modifiers,

    //--- Frame edges (reset by clear()) ----------------------------------
    pressed: Vec<(Trigger, Modifiers)>,
    released: HashSet<Trigger>,
    cursor_moved: bool,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops last frame's edges; held state survives.
    pub(super) fn clear(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.cursor_moved = false;
    }

    pub(super) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Closes the frame. Currently only traces a summary.
    pub(super) fn finalize_frame(&mut self) {
        if !self.pressed.is_empty() || !self.released.is_empty() {
            trace!(
                "Input frame: {} pressed, {} released, {} held",
                self.pressed.len(),
                self.released.len(),
                self.held.len()
            );
        }
    }

    /// Releases everything currently held (window lost focus).
    ///
    /// Each held trigger reports a release edge this frame, so screens do
    /// not see keys stuck down after an alt-tab.
    pub(super) fn release_all(&mut self) {
        self.released.extend(self.held.drain());
        self.modifiers = Modifiers::NONE;
    }

    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => self.press(key.into(), modifiers),
            InputEvent::KeyUp { key, modifiers } => self.release(key.into(), modifiers),
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.press(button.into(), modifiers)
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.release(button.into(), modifiers)
            }
            InputEvent::MouseMoved { x, y } => {
                self.cursor = Some((x, y));
                self.cursor_moved = true;
            }
            InputEvent::CursorLeft => self.cursor = None,
            InputEvent::Unidentified => {}
        }
    }

    fn press(&mut self, trigger: Trigger, modifiers: Modifiers) {
        self.modifiers = modifiers;
        // Auto-repeat arrives as repeated downs; only the first is an edge.
        if self.held.insert(trigger) {
            self.pressed.push((trigger, modifiers));
        }
    }

    fn release(&mut self, trigger: Trigger, modifiers: Modifiers) {
        self.modifiers = modifiers;
        if self.held.remove(&trigger) {
            self.released.insert(trigger);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Went down this frame.
    pub fn is_pressed(&self, trigger: impl Into<Trigger>) -> bool {
        let trigger = trigger.into();
        self.pressed.iter().any(|(t, _)| *t == trigger)
    }

    /// Currently held.
    pub fn is_down(&self, trigger: impl Into<Trigger>) -> bool {
        self.held.contains(&trigger.into())
    }

    /// Went up this frame.
    pub fn is_released(&self, trigger: impl Into<Trigger>) -> bool {
        self.released.contains(&trigger.into())
    }

    /// Presses of this frame in arrival order, with their modifiers.
    pub fn presses(&self) -> &[(Trigger, Modifiers)] {
        &self.pressed
    }

    pub fn held(&self) -> impl Iterator<Item = &Trigger> {
        self.held.iter()
    }

    pub fn released(&self) -> impl Iterator<Item = &Trigger> {
        self.released.iter()
    }

    /// Last known cursor position; `None` before the first move or after
    /// the cursor left the window.
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
