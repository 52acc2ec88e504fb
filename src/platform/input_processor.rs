//=========================================================================
// Input Processor
//=========================================================================
//
// winit WindowEvent pieces → stagehand `InputEvent`s for the InputBuffer.
//
// Keys and buttons are stamped with the modifier set last reported by
// ModifiersChanged. Cursor positions are rescaled from physical window
// pixels onto the back buffer, so a screen's hit tests use the same
// coordinates it draws with however the window is sized. Keys without a
// stagehand name never leave this module.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode, Modifiers, MouseButton};
use crate::core::render::Viewport;

//=== InputProcessor ======================================================

/// Per-window translation state: held modifiers and the window → back
/// buffer scale.
pub(crate) struct InputProcessor {
    modifiers: Modifiers,
    viewport: Viewport,
    cursor_scale: (f32, f32),
}

impl InputProcessor {
    pub(crate) fn new(viewport: Viewport) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            viewport,
            cursor_scale: (1.0, 1.0),
        }
    }

    //--- Window State -----------------------------------------------------

    pub(crate) fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = modifiers_from(state);
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Recomputes the cursor scale for a window of `width`×`height`
    /// physical pixels. A zero size (minimized) keeps the previous scale.
    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.cursor_scale = (
            self.viewport.width as f32 / width as f32,
            self.viewport.height as f32 / height as f32,
        );
    }

    //--- Translation ------------------------------------------------------

    /// Key press or release; `None` for keys the stack cannot bind.
    pub(crate) fn translate_key(&self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let key = key_from_winit(code)?;
        Some(self.stamp_key(key, event.state))
    }

    pub(crate) fn translate_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = button_from_winit(button);
        let modifiers = self.modifiers;
        if state.is_pressed() {
            InputEvent::MouseButtonDown { button, modifiers }
        } else {
            InputEvent::MouseButtonUp { button, modifiers }
        }
    }

    /// Cursor position in back-buffer pixels.
    pub(crate) fn translate_cursor(&self, x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved {
            x: x * self.cursor_scale.0,
            y: y * self.cursor_scale.1,
        }
    }

    fn stamp_key(&self, key: KeyCode, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        if state.is_pressed() {
            InputEvent::KeyDown { key, modifiers }
        } else {
            InputEvent::KeyUp { key, modifiers }
        }
    }
}

//=========================================================================
// winit Tables
//=========================================================================

/// winit already folds Cmd into Ctrl and Option into Alt on macOS.
fn modifiers_from(state: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    modifiers.set(Modifiers::SHIFT, state.shift_key());
    modifiers.set(Modifiers::CTRL, state.control_key());
    modifiers.set(Modifiers::ALT, state.alt_key());
    modifiers
}

/// Expands to a match over keys whose names agree on both sides.
macro_rules! shared_keys {
    ($code:expr; $($name:ident)*) => {
        match $code {
            $(WinitKeyCode::$name => Some(KeyCode::$name),)*
            _ => None,
        }
    };
}

/// Digits, letters, arrows and the editing keys menus use. Function keys,
/// the numpad and media keys have no stagehand name.
fn key_from_winit(code: WinitKeyCode) -> Option<KeyCode> {
    shared_keys!(code;
        Digit0 Digit1 Digit2 Digit3 Digit4 Digit5 Digit6 Digit7 Digit8 Digit9
        KeyA KeyB KeyC KeyD KeyE KeyF KeyG KeyH KeyI KeyJ KeyK KeyL KeyM
        KeyN KeyO KeyP KeyQ KeyR KeyS KeyT KeyU KeyV KeyW KeyX KeyY KeyZ
        ArrowUp ArrowDown ArrowLeft ArrowRight
        Space Enter Escape Tab Backspace Delete
    )
}

fn button_from_winit(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back | WinitMouseButton::Forward | WinitMouseButton::Other(_) => MouseButton::Other,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
