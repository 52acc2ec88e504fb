//=========================================================================
// Input Events
//=========================================================================
//
// Portable representation of the raw input the screen stack consumes.
//
// Event flow:
//   winit (platform thread) → InputEvent → StateTracker → InputSnapshot
//
// Events are cheap to clone and hash. Equality ignores cursor coordinates
// so the platform buffer can coalesce movement into "last position wins".
//
//=========================================================================

//=== External Dependencies ===============================================

use std::hash::{Hash, Hasher};

use bitflags::bitflags;

//=== MouseButton =========================================================

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side, thumb or any other extra button.
    Other,
}

//=== KeyCode =============================================================

/// Physical key location (layout independent).
///
/// Only the keys the stack and its stock screens care about are named;
/// the platform layer drops every other key before it reaches the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
}

//=== Modifiers ===========================================================

bitflags! {
    /// Modifier keys held while an event was produced.
    ///
    /// Left and right variants are not distinguished. Bindings match the
    /// set exactly, so `CTRL` never matches `CTRL | SHIFT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CTRL  = 0b010;
        const ALT   = 0b100;
    }
}

impl Modifiers {
    pub const NONE: Self = Self::empty();
}

//=== InputEvent ==========================================================

/// One raw input occurrence.
///
/// Equality and hashing compare the event kind and its key/button plus
/// modifiers. Cursor events compare equal regardless of coordinates.
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor moved, in back-buffer pixels (top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Cursor left the window; its position is no longer meaningful.
    CursorLeft,

    Unidentified,
}

impl InputEvent {
    /// Key or button press, if this event is one.
    pub fn press(&self) -> Option<(Trigger, Modifiers)> {
        match *self {
            Self::KeyDown { key, modifiers } => Some((Trigger::Key(key), modifiers)),
            Self::MouseButtonDown { button, modifiers } => {
                Some((Trigger::Button(button), modifiers))
            }
            _ => None,
        }
    }

    /// True for events whose coordinates may be coalesced.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }

    fn identity(&self) -> (u8, Option<Trigger>, Modifiers) {
        match *self {
            Self::KeyDown { key, modifiers } => (0, Some(Trigger::Key(key)), modifiers),
            Self::KeyUp { key, modifiers } => (1, Some(Trigger::Key(key)), modifiers),
            Self::MouseButtonDown { button, modifiers } => {
                (2, Some(Trigger::Button(button)), modifiers)
            }
            Self::MouseButtonUp { button, modifiers } => {
                (3, Some(Trigger::Button(button)), modifiers)
            }
            Self::MouseMoved { .. } => (4, None, Modifiers::NONE),
            Self::CursorLeft => (5, None, Modifiers::NONE),
            Self::Unidentified => (6, None, Modifiers::NONE),
        }
    }
}

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for InputEvent {}

impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

//=== Trigger =============================================================

/// Anything that can be bound to a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(KeyCode),
    Button(MouseButton),
}

impl From<KeyCode> for Trigger {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for Trigger {
    fn from(button: MouseButton) -> Self {
        Self::Button(button)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
