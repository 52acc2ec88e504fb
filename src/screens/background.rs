//=========================================================================
// Background Screen
//=========================================================================

use std::time::Duration;

use crate::core::render::{Color, Rect, RenderError};
use crate::core::screen::{DrawContext, Screen};

/// Vertical two-color gradient filling the viewport.
///
/// Sits at the bottom of the stack. It is covered (and hidden) by any
/// opaque screen above it and shows through popups.
#[derive(Debug, Clone)]
pub struct BackgroundScreen {
    top: Color,
    bottom: Color,
    bands: u32,
}

impl BackgroundScreen {
    pub fn new() -> Self {
        Self::with_colors(Color::rgb(0.05, 0.07, 0.16), Color::rgb(0.18, 0.24, 0.42))
    }

    pub fn with_colors(top: Color, bottom: Color) -> Self {
        Self { top, bottom, bands: 32 }
    }
}

impl Default for BackgroundScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for BackgroundScreen {
    fn transition_on_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn transition_off_time(&self) -> Duration {
        Duration::from_millis(500)
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<(), RenderError> {
        let bounds = ctx.viewport().bounds();
        let bands = self.bands.min(ctx.viewport().height).max(1);
        let band_height = bounds.height / bands as f32;

        // The compositor fades the snapshot while transitioning.
        for i in 0..bands {
            let t = if bands == 1 { 0.0 } else { i as f32 / (bands - 1) as f32 };
            let band = Rect::new(0.0, i as f32 * band_height, bounds.width, band_height.ceil());
            ctx.fill_rect(band, self.top.lerp(self.bottom, t));
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
