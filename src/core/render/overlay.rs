//=========================================================================
// Frame Rate Overlay
//=========================================================================
//
// Counts presented frames over one-second windows and draws the last
// window's count as "NN fps" in the top-left corner of the back buffer,
// after the stack has been composited.
//
// Glyphs are 3x5 bitmaps scaled by `CELL`, with a one pixel black drop
// shadow under white text.
//
//=========================================================================

use std::time::Duration;

use super::{Color, Rect, RenderBackend, RenderError};

//=== Layout ==============================================================

/// Top-left corner of the text on the back buffer.
pub const FPS_ORIGIN: (f32, f32) = (30.0, 25.0);

const CELL: f32 = 2.0;
const ADVANCE: f32 = 4.0 * CELL;
const WINDOW: Duration = Duration::from_secs(1);

//=== FpsCounter ==========================================================

/// Frames per second, refreshed once every second of frame time.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one frame that took `elapsed` of wall time.
    pub fn frame(&mut self, elapsed: Duration) {
        self.frames += 1;
        self.elapsed += elapsed;

        if self.elapsed >= WINDOW {
            self.fps = self.frames;
            self.frames = 0;
            // A long stall must not roll over again on every later frame.
            let rest = self.elapsed.as_nanos() % WINDOW.as_nanos();
            self.elapsed = Duration::from_nanos(rest as u64);
        }
    }

    /// Frames counted during the last complete window.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

//=== Drawing =============================================================

/// Draws `"{fps} fps"` onto the back buffer.
pub fn draw_fps<R: RenderBackend + ?Sized>(renderer: &mut R, fps: u32) -> Result<(), RenderError> {
    renderer.bind_target(None)?;

    let text = format!("{} fps", fps);
    let (x, y) = FPS_ORIGIN;
    draw_text(renderer, &text, x + 1.0, y + 1.0, Color::BLACK);
    draw_text(renderer, &text, x, y, Color::WHITE);
    Ok(())
}

fn draw_text<R: RenderBackend + ?Sized>(renderer: &mut R, text: &str, x: f32, y: f32, color: Color) {
    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let left = x + index as f32 * ADVANCE;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    let cell = Rect::new(left + col as f32 * CELL, y + row as f32 * CELL, CELL, CELL);
                    renderer.fill_rect(cell, color);
                }
            }
        }
    }
}

/// Rows of a 3x5 glyph, most significant bit on the left.
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'f' => [0b011, 0b010, 0b111, 0b010, 0b010],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        's' => [0b011, 0b100, 0b010, 0b001, 0b110],
        _ => return None,
    };
    Some(rows)
}

//=========================================================================
// Unit Tests
//=========================================================================
