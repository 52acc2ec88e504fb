//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagehand::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Bootstrap
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Screen system
pub use crate::core::screen::{
    DrawContext, ResourceContext, Screen, ScreenContext, ScreenId, ScreenManager, ScreenRegistry, ScreenState,
    UpdateStatus,
};

// Errors
pub use crate::core::content::ContentError;
pub use crate::core::error::{InvalidState, ScreenError};

// Input
pub use crate::core::input::{GestureSet, InputSnapshot, KeyCode, MenuAction, Modifiers, MouseButton};

// Rendering
pub use crate::core::clock::FrameTime;
pub use crate::core::render::{Color, Rect, RenderBackend, RenderError, Texture, TransitionEffect, Viewport};

// Stock screens
pub use crate::screens::{BackgroundScreen, LogoScreen, MenuScreen, MessageBoxScreen, PreviewZoom};
