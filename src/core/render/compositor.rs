//=========================================================================
// Transition Compositor
//=========================================================================
//
// Draws the screen stack, fading transitioning screens as a whole.
//
// Architecture:
//   compose()
//     ├─ pass 1: for each TransitionOn/Off screen (bottom → top)
//     │     lease.acquire() → bind → clear transparent → Screen::draw → unbind
//     └─ pass 2: back buffer ← clear black
//           Hidden        → skipped
//           snapshotted   → draw_target(slot, effect.quad(position))
//           otherwise     → Screen::draw directly
//
// Snapshots exist because a screen is made of many overlapping draws;
// fading each draw separately would let the pieces show through one
// another. Fading the flattened snapshot fades the screen as one layer.
//
// Slots live in a `SlotPool` owned by the compositor. Each frame takes a
// `SlotLease`; slots are handed out in traversal order and the lease
// returns them all when dropped. The pool grows by exactly the shortfall
// and never shrinks.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Color, Quad, Rect, RenderBackend, RenderError, TargetId, Texture, Viewport};
use crate::core::clock::FrameTime;
use crate::core::content::{ContentCache, ContentError};
use crate::core::error::ScreenError;
use crate::core::screen::{DrawContext, ResourceContext, Screen, ScreenStack, ScreenState, Transition};

//=== TransitionEffect ====================================================

/// How a snapshot is placed on the back buffer while transitioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionEffect {
    /// Full-screen quad, alpha `1 - position`.
    Fade,

    /// Grows out of (or shrinks back into) a preview rectangle.
    ///
    /// At position 1 the quad sits at `anchor` (centre, in pixels) scaled
    /// by `start_scale`; at position 0 it covers the viewport. Alpha is
    /// `1 - position²`, which ramps in faster than a linear fade so the
    /// enlarged snapshot does not pop in.
    Zoom { anchor: (f32, f32), start_scale: f32 },
}

impl TransitionEffect {
    pub fn alpha(&self, position: f32) -> f32 {
        let p = position.clamp(0.0, 1.0);
        match self {
            Self::Fade => 1.0 - p,
            Self::Zoom { .. } => 1.0 - p * p,
        }
    }

    /// Destination quad for a snapshot at `position`.
    pub fn quad(&self, position: f32, viewport: Viewport) -> Quad {
        let bounds = viewport.bounds();
        let dest = match *self {
            Self::Fade => bounds,
            Self::Zoom { anchor, start_scale } => {
                let t = position.clamp(0.0, 1.0);
                let lerp = |a: f32, b: f32| a + (b - a) * t;
                let (cx, cy) = viewport.center();
                let scale = lerp(1.0, start_scale);
                Rect::centered(
                    lerp(cx, anchor.0),
                    lerp(cy, anchor.1),
                    bounds.width * scale,
                    bounds.height * scale,
                )
            }
        };
        Quad::new(dest, self.alpha(position))
    }
}

//=== SlotPool ============================================================

/// Grow-only pool of full-viewport off-screen targets.
#[derive(Debug, Default)]
pub struct SlotPool {
    slots: Vec<TargetId>,
    last_frame_slots: usize,
}

impl SlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame. Every slot is free again when the lease drops.
    pub fn begin_frame(&mut self) -> SlotLease<'_> {
        SlotLease { pool: self, next: 0 }
    }

    /// Total slots ever allocated.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Slots used by the most recently finished frame.
    pub fn last_frame_slots(&self) -> usize {
        self.last_frame_slots
    }
}

/// One frame's claim on the [`SlotPool`].
#[derive(Debug)]
pub struct SlotLease<'a> {
    pool: &'a mut SlotPool,
    next: usize,
}

impl SlotLease<'_> {
    /// Next free slot, allocating one when the pool is exhausted.
    pub fn acquire(&mut self, renderer: &mut dyn RenderBackend) -> Result<TargetId, RenderError> {
        if self.next == self.pool.slots.len() {
            let viewport = renderer.viewport();
            let target = renderer.create_target(viewport.width, viewport.height)?;
            debug!("Transition slot pool grew to {} ({})", self.next + 1, target);
            self.pool.slots.push(target);
        }

        let target = self.pool.slots[self.next];
        self.next += 1;
        Ok(target)
    }

    pub fn in_use(&self) -> usize {
        self.next
    }
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        self.pool.last_frame_slots = self.next;
    }
}

//=== TransitionCompositor ================================================

#[derive(Debug, Default)]
pub struct TransitionCompositor {
    pool: SlotPool,
    snapshots: Vec<Option<TargetId>>,
}

impl TransitionCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    /// Draws the whole stack onto the back buffer.
    pub fn compose(
        &mut self,
        stack: &mut ScreenStack,
        renderer: &mut dyn RenderBackend,
        content: &ContentCache,
        time: FrameTime,
    ) -> Result<(), ScreenError> {
        let result = self.compose_passes(stack, renderer, content, time);
        if result.is_err() {
            // Leave the backend on the back buffer whatever failed.
            let _ = renderer.bind_target(None);
        }
        result
    }

    fn compose_passes(
        &mut self,
        stack: &mut ScreenStack,
        renderer: &mut dyn RenderBackend,
        content: &ContentCache,
        time: FrameTime,
    ) -> Result<(), ScreenError> {
        let mut lease = self.pool.begin_frame();
        self.snapshots.clear();

        //--- Pass 1: snapshot transitioning screens ------------------------
        for entry in stack.iter_mut() {
            if !entry.transition.state().is_transitioning() {
                self.snapshots.push(None);
                continue;
            }

            let slot = lease.acquire(renderer)?;
            renderer.bind_target(Some(slot))?;
            renderer.clear(Color::TRANSPARENT);

            let mut ctx = DrawContext::new(&mut *renderer, content, time, &entry.transition);
            entry.screen.draw(&mut ctx)?;

            renderer.bind_target(None)?;
            self.snapshots.push(Some(slot));
        }
        trace!("Snapshotted {} transitioning screens", lease.in_use());

        //--- Pass 2: composite onto the back buffer -------------------------
        renderer.clear(Color::BLACK);
        let viewport = renderer.viewport();

        for (entry, snapshot) in stack.iter_mut().zip(self.snapshots.iter()) {
            if entry.transition.state() == ScreenState::Hidden {
                continue;
            }

            match snapshot {
                Some(slot) => {
                    let quad = entry
                        .screen
                        .transition_effect()
                        .quad(entry.transition.position(), viewport);
                    renderer.draw_target(*slot, &quad)?;
                }
                None => {
                    let mut ctx = DrawContext::new(&mut *renderer, content, time, &entry.transition);
                    entry.screen.draw(&mut ctx)?;
                }
            }
        }

        Ok(())
    }
}

//=== Previews ============================================================

/// Renders `screen` fully on into a new `width`×`height` texture.
///
/// The screen is loaded, drawn at full viewport size into a scratch
/// target, scaled down into the returned texture and unloaded again.
/// The scratch target is kept in the content cache and reused.
pub fn render_preview(
    screen: &mut dyn Screen,
    resources: &mut ResourceContext,
    width: u32,
    height: u32,
) -> Result<Texture, ContentError> {
    const SCRATCH: &str = "preview.scratch";

    screen.load_content(resources).map_err(|source| ContentError::Nested {
        screen: screen.name().to_owned(),
        source: Box::new(source),
    })?;

    let viewport = resources.viewport;
    let scratch = match resources.content.texture(SCRATCH) {
        Ok(texture) => texture,
        Err(_) => {
            let target = resources.renderer.create_target(viewport.width, viewport.height)?;
            let texture = Texture {
                target,
                width: viewport.width,
                height: viewport.height,
            };
            resources.content.insert_texture(SCRATCH, texture)?;
            texture
        }
    };
    let thumbnail = resources.renderer.create_target(width, height)?;
    let previous = resources.renderer.bound_target();

    let mut transition = Transition::new(screen.transition_on_time(), screen.transition_off_time());
    transition.force_active();

    resources.renderer.bind_target(Some(scratch.target))?;
    resources.renderer.clear(Color::BLACK);
    let drawn = {
        let mut ctx = DrawContext::new(&mut *resources.renderer, &*resources.content, FrameTime::ZERO, &transition);
        screen.draw(&mut ctx)
    };

    resources.renderer.bind_target(Some(thumbnail))?;
    resources.renderer.clear(Color::BLACK);
    let bounds = Rect::new(0.0, 0.0, width as f32, height as f32);
    resources.renderer.draw_target(scratch.target, &Quad::new(bounds, 1.0))?;
    resources.renderer.bind_target(previous)?;

    screen.unload_content(resources);
    if let Err(err) = drawn {
        let _ = resources.renderer.destroy_target(thumbnail);
        return Err(err.into());
    }

    Ok(Texture {
        target: thumbnail,
        width,
        height,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
