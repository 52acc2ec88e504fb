//=========================================================================
// Preview Zoom
//=========================================================================
//
// Wraps a screen launched from a menu preview so that it grows out of the
// preview rectangle on its way in and shrinks back into it on the way out.
// Every hook and property except the transition effect is forwarded.
// Menu cancel is consumed by the wrapper and exits the launched screen, so
// a plain scene always has a way back to the menu it came from.
//
//=========================================================================

use std::time::Duration;

use crate::core::content::ContentError;
use crate::core::input::{GestureSet, InputSnapshot};
use crate::core::render::{Rect, RenderError, TransitionEffect, Viewport};
use crate::core::screen::{DrawContext, ResourceContext, Screen, ScreenContext, UpdateStatus};

pub struct PreviewZoom {
    inner: Box<dyn Screen>,
    effect: TransitionEffect,
}

impl PreviewZoom {
    pub fn new(inner: Box<dyn Screen>, anchor: (f32, f32), start_scale: f32) -> Self {
        Self {
            inner,
            effect: TransitionEffect::Zoom { anchor, start_scale },
        }
    }

    /// Zooms from `preview`, assuming it shows the whole `viewport`.
    pub fn from_preview(inner: Box<dyn Screen>, preview: Rect, viewport: Viewport) -> Self {
        let scale = preview.width / viewport.width as f32;
        Self::new(inner, preview.center(), scale)
    }

    pub fn into_inner(self) -> Box<dyn Screen> {
        self.inner
    }
}

impl std::fmt::Debug for PreviewZoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewZoom")
            .field("inner", &self.inner.name())
            .field("effect", &self.effect)
            .finish()
    }
}

impl Screen for PreviewZoom {
    fn load_content(&mut self, resources: &mut ResourceContext) -> Result<(), ContentError> {
        self.inner.load_content(resources)
    }

    fn unload_content(&mut self, resources: &mut ResourceContext) {
        self.inner.unload_content(resources);
    }

    fn update(&mut self, ctx: &mut ScreenContext, status: UpdateStatus) {
        self.inner.update(ctx, status);
    }

    fn handle_input(&mut self, ctx: &mut ScreenContext, input: &InputSnapshot) {
        if input.is_menu_cancel() {
            ctx.exit_screen();
            return;
        }
        self.inner.handle_input(ctx, input);
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        self.inner.draw(ctx)
    }

    fn is_popup(&self) -> bool {
        self.inner.is_popup()
    }

    fn has_cursor(&self) -> bool {
        self.inner.has_cursor()
    }

    fn has_virtual_stick(&self) -> bool {
        self.inner.has_virtual_stick()
    }

    fn transition_on_time(&self) -> Duration {
        self.inner.transition_on_time()
    }

    fn transition_off_time(&self) -> Duration {
        self.inner.transition_off_time()
    }

    fn enabled_gestures(&self) -> GestureSet {
        self.inner.enabled_gestures()
    }

    fn transition_effect(&self) -> TransitionEffect {
        self.effect
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
