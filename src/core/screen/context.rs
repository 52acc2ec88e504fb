//=========================================================================
// Hook Contexts
//=========================================================================
//
// What a screen can see and do from inside each lifecycle hook.
//
//   ResourceContext  load_content / unload_content  (content + renderer)
//   ScreenContext    update / handle_input          (commands, read-only state)
//   DrawContext      draw                           (bound render target)
//
// Contexts borrow from the manager for the duration of one hook call.
// Stack mutations requested through `ScreenContext` are queued and applied
// by the manager right after the hook returns.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::command::{CommandQueue, ScreenCommand};
use super::transition::Transition;
use super::{Screen, ScreenId, ScreenState};
use crate::core::clock::FrameTime;
use crate::core::content::{ContentCache, ContentError};
use crate::core::render::{Color, Quad, Rect, RenderBackend, RenderError, TargetId, Texture, Viewport};

//=== ResourceContext =====================================================

/// Access to shared content and the renderer during load/unload.
pub struct ResourceContext<'a> {
    pub content: &'a mut ContentCache,
    pub renderer: &'a mut dyn RenderBackend,
    pub viewport: Viewport,
}

impl<'a> ResourceContext<'a> {
    pub fn new(content: &'a mut ContentCache, renderer: &'a mut dyn RenderBackend) -> Self {
        let viewport = renderer.viewport();
        Self {
            content,
            renderer,
            viewport,
        }
    }

    /// Shorthand for `content.texture(name)`.
    pub fn texture(&self, name: &str) -> Result<Texture, ContentError> {
        self.content.texture(name)
    }
}

//=== ScreenContext =======================================================

/// Context for `update` and `handle_input`.
pub struct ScreenContext<'a> {
    id: ScreenId,
    time: FrameTime,
    transition: &'a Transition,
    viewport: Viewport,
    content: &'a ContentCache,
    commands: &'a mut CommandQueue,
}

impl<'a> ScreenContext<'a> {
    pub(crate) fn new(
        id: ScreenId,
        time: FrameTime,
        transition: &'a Transition,
        viewport: Viewport,
        content: &'a ContentCache,
        commands: &'a mut CommandQueue,
    ) -> Self {
        Self {
            id,
            time,
            transition,
            viewport,
            content,
            commands,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Id of the screen this hook runs for.
    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn state(&self) -> ScreenState {
        self.transition.state()
    }

    pub fn transition_position(&self) -> f32 {
        self.transition.position()
    }

    pub fn transition_alpha(&self) -> f32 {
        self.transition.alpha()
    }

    pub fn is_exiting(&self) -> bool {
        self.transition.is_exiting()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn content(&self) -> &ContentCache {
        self.content
    }

    //--- Commands ---------------------------------------------------------

    /// Starts this screen's off transition (removes it at once if its
    /// off time is zero).
    pub fn exit_screen(&mut self) {
        self.commands.push(ScreenCommand::Exit(self.id));
    }

    /// Starts another screen's off transition.
    pub fn exit(&mut self, id: ScreenId) {
        self.commands.push(ScreenCommand::Exit(id));
    }

    /// Adds a screen on top of the stack.
    pub fn add_screen(&mut self, screen: Box<dyn Screen>) {
        self.commands.push(ScreenCommand::Add(screen));
    }

    pub fn add<S: Screen + 'static>(&mut self, screen: S) {
        self.add_screen(Box::new(screen));
    }

    /// Evicts a screen immediately, skipping its off transition.
    pub fn remove_screen(&mut self, id: ScreenId) {
        self.commands.push(ScreenCommand::Remove(id));
    }

    /// Exits every screen; the application ends once the stack is empty.
    pub fn exit_game(&mut self) {
        self.commands.push(ScreenCommand::ExitGame);
    }
}

//=== DrawContext =========================================================

/// Context for `draw`. Drawing goes to whatever target the compositor
/// bound: an off-screen snapshot while transitioning, else the back buffer.
pub struct DrawContext<'a> {
    renderer: &'a mut dyn RenderBackend,
    content: &'a ContentCache,
    time: FrameTime,
    state: ScreenState,
    position: f32,
    viewport: Viewport,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(
        renderer: &'a mut dyn RenderBackend,
        content: &'a ContentCache,
        time: FrameTime,
        transition: &Transition,
    ) -> Self {
        let viewport = renderer.viewport();
        Self {
            renderer,
            content,
            time,
            state: transition.state(),
            position: transition.position(),
            viewport,
        }
    }

    //--- Drawing ----------------------------------------------------------

    pub fn clear(&mut self, color: Color) {
        self.renderer.clear(color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.renderer.fill_rect(rect, color);
    }

    /// Stretches `texture` over `dest` with the given opacity.
    pub fn draw_texture(&mut self, texture: Texture, dest: Rect, opacity: f32) -> Result<(), RenderError> {
        self.renderer.draw_target(texture.target, &Quad::new(dest, opacity))
    }

    pub fn draw_target(&mut self, target: TargetId, quad: &Quad) -> Result<(), RenderError> {
        self.renderer.draw_target(target, quad)
    }

    /// Raw backend access for anything the helpers do not cover.
    pub fn renderer(&mut self) -> &mut dyn RenderBackend {
        &mut *self.renderer
    }

    //--- Queries ----------------------------------------------------------

    pub fn content(&self) -> &ContentCache {
        self.content
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn transition_position(&self) -> f32 {
        self.position
    }

    pub fn transition_alpha(&self) -> f32 {
        1.0 - self.position
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
