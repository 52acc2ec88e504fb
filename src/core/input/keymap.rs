//=========================================================================
// Menu Keymap
//=========================================================================
//
// Maps key/button presses to the semantic menu actions screens consume.
//
// Architecture:
//   (Trigger, Modifiers) → HashMap → MenuAction
//
// Modifiers must match exactly: a binding on plain Enter does not fire
// for Ctrl+Enter.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, Modifiers, MouseButton, Trigger};

//=== MenuAction ==========================================================

/// Semantic menu events, independent of the device that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Select,
    Cancel,
    Up,
    Down,
}

//=== Keymap ==============================================================

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<(Trigger, Modifiers), MenuAction>,
}

impl Keymap {
    /// A keymap with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Enter/Space select, Escape/Backspace cancel, arrows or W/S move,
    /// left click selects.
    pub fn menu_defaults() -> Self {
        let mut keymap = Self::empty();

        keymap.bind(KeyCode::Enter, MenuAction::Select);
        keymap.bind(KeyCode::Space, MenuAction::Select);
        keymap.bind(MouseButton::Left, MenuAction::Select);

        keymap.bind(KeyCode::Escape, MenuAction::Cancel);
        keymap.bind(KeyCode::Backspace, MenuAction::Cancel);

        keymap.bind(KeyCode::ArrowUp, MenuAction::Up);
        keymap.bind(KeyCode::KeyW, MenuAction::Up);
        keymap.bind(KeyCode::ArrowDown, MenuAction::Down);
        keymap.bind(KeyCode::KeyS, MenuAction::Down);

        keymap
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a trigger without modifiers.
    pub fn bind(&mut self, trigger: impl Into<Trigger>, action: MenuAction) {
        self.bind_with_mods(trigger, Modifiers::NONE, action);
    }

    pub fn bind_with_mods(
        &mut self,
        trigger: impl Into<Trigger>,
        modifiers: Modifiers,
        action: MenuAction,
    ) {
        self.bindings.insert((trigger.into(), modifiers), action);
    }

    /// Removes the exact (trigger, modifiers) binding.
    pub fn unbind_with_mods(&mut self, trigger: impl Into<Trigger>, modifiers: Modifiers) {
        self.bindings.remove(&(trigger.into(), modifiers));
    }

    /// Removes every binding of `trigger`, whatever its modifiers.
    pub fn unbind_all(&mut self, trigger: impl Into<Trigger>) {
        let trigger = trigger.into();
        self.bindings.retain(|(t, _), _| *t != trigger);
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    //--- Mapping ----------------------------------------------------------

    pub fn map(&self, trigger: Trigger, modifiers: Modifiers) -> Option<MenuAction> {
        self.bindings.get(&(trigger, modifiers)).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::menu_defaults()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
