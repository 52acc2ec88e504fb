//=========================================================================
// Input Snapshot
//=========================================================================
//
// Immutable, de-duplicated view of one frame of input, handed to the
// focused screen's `handle_input`. Screens never poll devices.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, Modifiers, MouseButton, Trigger};
use super::keymap::{Keymap, MenuAction};
use super::state_tracker::StateTracker;
use crate::core::render::Viewport;

//=== InputSnapshot =======================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    actions: HashSet<MenuAction>,
    pressed: HashSet<Trigger>,
    down: HashSet<Trigger>,
    released: HashSet<Trigger>,
    cursor: Option<(f32, f32)>,
    cursor_valid: bool,
    modifiers: Modifiers,
}

impl InputSnapshot {
    /// Captures the tracker's current frame, resolving menu actions
    /// through `keymap` and cursor validity against `viewport`.
    pub(crate) fn capture(tracker: &StateTracker, keymap: &Keymap, viewport: Viewport) -> Self {
        let actions = tracker
            .presses()
            .iter()
            .filter_map(|&(trigger, mods)| keymap.map(trigger, mods))
            .collect();

        let cursor = tracker.cursor();
        let cursor_valid = cursor.is_some_and(|pos| viewport.contains(pos));

        Self {
            actions,
            pressed: tracker.presses().iter().map(|(t, _)| *t).collect(),
            down: tracker.held().copied().collect(),
            released: tracker.released().copied().collect(),
            cursor,
            cursor_valid,
            modifiers: tracker.modifiers(),
        }
    }

    //--- Builders ---------------------------------------------------------

    /// Adds a menu action; mostly for driving screens in tests.
    pub fn with_action(mut self, action: MenuAction) -> Self {
        self.actions.insert(action);
        self
    }

    /// Adds a press edge (and marks the trigger held).
    pub fn with_press(mut self, trigger: impl Into<Trigger>) -> Self {
        let trigger = trigger.into();
        self.pressed.insert(trigger);
        self.down.insert(trigger);
        self
    }

    /// Places a valid cursor at `(x, y)`.
    pub fn with_cursor(mut self, x: f32, y: f32) -> Self {
        self.cursor = Some((x, y));
        self.cursor_valid = true;
        self
    }

    //--- Menu Actions -----------------------------------------------------

    pub fn is_action(&self, action: MenuAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn is_menu_select(&self) -> bool {
        self.is_action(MenuAction::Select)
    }

    pub fn is_menu_cancel(&self) -> bool {
        self.is_action(MenuAction::Cancel)
    }

    pub fn is_menu_up(&self) -> bool {
        self.is_action(MenuAction::Up)
    }

    pub fn is_menu_down(&self) -> bool {
        self.is_action(MenuAction::Down)
    }

    pub fn actions(&self) -> impl Iterator<Item = &MenuAction> {
        self.actions.iter()
    }

    //--- Raw Queries ------------------------------------------------------

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&Trigger::Key(key))
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&Trigger::Key(key))
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.released.contains(&Trigger::Key(key))
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&Trigger::Button(button))
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.down.contains(&Trigger::Button(button))
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.released.contains(&Trigger::Button(button))
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Cursor -----------------------------------------------------------

    /// Last cursor position, valid or not.
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// True once the cursor has moved and currently lies in the viewport.
    pub fn is_cursor_valid(&self) -> bool {
        self.cursor_valid
    }

    /// The cursor position, only when it is valid.
    pub fn valid_cursor(&self) -> Option<(f32, f32)> {
        self.cursor.filter(|_| self.cursor_valid)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
