//=========================================================================
// Screen System
//=========================================================================
//
// Stack of navigable screens with timed transitions.
//
// Architecture:
//   ScreenManager
//     ├─ ScreenStack ── Vec<ScreenEntry { id, Box<dyn Screen>, Transition }>
//     ├─ CommandQueue   (mutations requested from inside hooks)
//     ├─ InputRouter    (one focused screen per frame)
//     ├─ TransitionCompositor
//     ├─ ContentCache
//     └─ RenderBackend
//
// Flow per frame:
//   update(): top → bottom  advance transition → Screen::update → FocusPass
//             evict finished screens → focused Screen::handle_input
//   draw():   bottom → top  snapshot transitioning screens → composite
//
//=========================================================================

//=== Module Declarations =================================================

mod command;
mod context;
mod manager;
mod registry;
mod stack;
mod transition;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use command::{CommandQueue, ScreenCommand};
pub use context::{DrawContext, ResourceContext, ScreenContext};
pub use manager::ScreenManager;
pub use registry::{ScreenFactory, ScreenRegistry, ScreenTemplate};
pub use stack::{ScreenEntry, ScreenStack};
pub use transition::{Outcome, Transition};

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::content::ContentError;
use crate::core::input::{GestureSet, InputSnapshot};
use crate::core::render::{RenderError, TransitionEffect};

//=== ScreenId ============================================================

/// Identity of a screen while it is owned by the stack.
///
/// Assigned by the manager on add, never reused within one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

impl ScreenId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== ScreenState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenState {
    TransitionOn,
    Active,
    TransitionOff,
    Hidden,
}

impl ScreenState {
    /// Entering or leaving; such screens are drawn through a snapshot.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::TransitionOn | Self::TransitionOff)
    }
}

//=== UpdateStatus ========================================================

/// Flags computed by the traversal for each screen's update hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStatus {
    /// A screen above already took input focus this frame (or the window
    /// itself is unfocused).
    pub other_screen_has_focus: bool,

    /// A non-popup screen above is on or entering.
    pub covered_by_other_screen: bool,
}

//=== Screen Trait ========================================================

/// A navigable unit of content living on the screen stack.
///
/// Only [`draw`](Self::draw) is required. Everything else has a default
/// suited to a plain, opaque, instantly-appearing screen.
///
/// ```ignore
/// struct Splash;
///
/// impl Screen for Splash {
///     fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
///         ctx.clear(Color::rgb(0.1, 0.1, 0.2));
///         Ok(())
///     }
/// }
/// ```
pub trait Screen: Send {
    //--- Lifecycle --------------------------------------------------------

    /// Called once, synchronously, when the screen is added.
    ///
    /// An error keeps the screen off the stack.
    fn load_content(&mut self, _resources: &mut ResourceContext) -> Result<(), ContentError> {
        Ok(())
    }

    /// Called exactly once when the screen leaves the stack.
    fn unload_content(&mut self, _resources: &mut ResourceContext) {}

    /// Called every frame, covered or not, after the transition advanced.
    fn update(&mut self, _ctx: &mut ScreenContext, _status: UpdateStatus) {}

    /// Called at most once per frame, only on the focused screen.
    fn handle_input(&mut self, _ctx: &mut ScreenContext, _input: &InputSnapshot) {}

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError>;

    //--- Declared Properties ----------------------------------------------

    /// Popups do not cover the screens beneath them.
    fn is_popup(&self) -> bool {
        false
    }

    fn has_cursor(&self) -> bool {
        false
    }

    fn has_virtual_stick(&self) -> bool {
        false
    }

    fn transition_on_time(&self) -> Duration {
        Duration::ZERO
    }

    fn transition_off_time(&self) -> Duration {
        Duration::ZERO
    }

    fn enabled_gestures(&self) -> GestureSet {
        GestureSet::empty()
    }

    /// How the snapshot is composited while transitioning.
    fn transition_effect(&self) -> TransitionEffect {
        TransitionEffect::Fade
    }

    /// Name used in logs and errors.
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }
}

/// `type_name` without the module path.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

//=========================================================================
// Unit Tests
//=========================================================================
