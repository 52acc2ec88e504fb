//=========================================================================
// Logo Screen
//=========================================================================
//
// Splash that shows the "logo" texture for a fixed time, then exits
// itself. Select or cancel cuts the wait short.
//
//=========================================================================

use std::time::Duration;

use log::debug;

use crate::core::content::ContentError;
use crate::core::input::InputSnapshot;
use crate::core::render::{Color, RenderError, Texture};
use crate::core::screen::{DrawContext, ResourceContext, Screen, ScreenContext, UpdateStatus};

/// Name of the texture the splash draws; must be in the content cache.
pub const LOGO_TEXTURE: &str = "logo";

#[derive(Debug)]
pub struct LogoScreen {
    remaining: Duration,
    logo: Option<Texture>,
}

impl LogoScreen {
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
            logo: None,
        }
    }

    /// Time left before the splash exits on its own.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

impl Screen for LogoScreen {
    fn load_content(&mut self, resources: &mut ResourceContext) -> Result<(), ContentError> {
        self.logo = Some(resources.texture(LOGO_TEXTURE)?);
        Ok(())
    }

    fn unload_content(&mut self, _resources: &mut ResourceContext) {
        self.logo = None;
    }

    fn update(&mut self, ctx: &mut ScreenContext, _status: UpdateStatus) {
        self.remaining = self.remaining.saturating_sub(ctx.time().elapsed);

        if self.remaining.is_zero() && !ctx.is_exiting() {
            debug!("Logo finished, exiting");
            ctx.exit_screen();
        }
    }

    fn handle_input(&mut self, _ctx: &mut ScreenContext, input: &InputSnapshot) {
        if input.is_menu_select() || input.is_menu_cancel() {
            self.remaining = Duration::ZERO;
        }
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(600)
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        ctx.clear(Color::WHITE);
        if let Some(logo) = self.logo {
            let bounds = ctx.viewport().bounds();
            ctx.draw_texture(logo, bounds, 1.0)?;
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
