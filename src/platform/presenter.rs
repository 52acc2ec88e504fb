//=========================================================================
// Presenter
//=========================================================================
//
// Puts the core thread's frames on the window.
//
// The latest `Frame` received is kept until the next redraw, where it is
// stretched nearest-neighbour over the window's physical size and handed
// to softbuffer. Frames that arrive between two redraws replace each
// other; only the newest is shown.
//
//=========================================================================

use std::num::NonZeroU32;
use std::rc::Rc;

use log::*;
use softbuffer::{Context, SoftBufferError, Surface};
use winit::window::Window;

use crate::core::render::Frame;

//=== Presenter ===========================================================

pub(crate) struct Presenter {
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    frame: Option<Frame>,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            surface: None,
            frame: None,
        }
    }

    /// Creates the drawing surface for `window`.
    pub fn attach(&mut self, window: &Rc<Window>) -> Result<(), SoftBufferError> {
        let context = Context::new(window.clone())?;
        self.surface = Some(Surface::new(&context, window.clone())?);
        debug!(target: "platform", "Presentation surface attached");
        Ok(())
    }

    pub fn submit(&mut self, frame: Frame) {
        self.frame = Some(frame);
    }

    #[cfg(test)]
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Shows the latest frame, stretched to `width`×`height`.
    ///
    /// Does nothing before a surface or a frame exists, or while the
    /// window has no area (minimized).
    pub fn present(&mut self, width: u32, height: u32) -> Result<(), SoftBufferError> {
        let (Some(surface), Some(frame)) = (self.surface.as_mut(), self.frame.as_ref()) else {
            return Ok(());
        };
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(());
        };

        surface.resize(w, h)?;
        let mut buffer = surface.buffer_mut()?;
        stretch(frame, &mut buffer, width, height);
        buffer.present()
    }
}

//=== Scaling =============================================================

/// Nearest-neighbour copy of `frame` into a `width`×`height` pixel buffer.
pub(crate) fn stretch(frame: &Frame, dest: &mut [u32], width: u32, height: u32) {
    if frame.width == 0 || frame.height == 0 || width == 0 {
        dest.fill(0);
        return;
    }

    let src_w = frame.width as u64;
    let src_h = frame.height as u64;

    for (y, row) in dest.chunks_exact_mut(width as usize).take(height as usize).enumerate() {
        let sy = y as u64 * src_h / height as u64;
        let line = (sy * src_w) as usize;
        for (x, pixel) in row.iter_mut().enumerate() {
            let sx = (x as u64 * src_w / width as u64) as usize;
            *pixel = frame.pixels.get(line + sx).copied().unwrap_or(0);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
