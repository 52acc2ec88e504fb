//=========================================================================
// Software Renderer
//=========================================================================
//
// CPU implementation of `RenderBackend`.
//
// Every target (including the back buffer) is a plain RGBA surface.
// Quads are sampled nearest-neighbour and blended with straight-alpha
// "source over". Throughput is not a goal; determinism is, so the same
// frame always produces the same pixels and tests can inspect them.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Color, Frame, Quad, Rect, RenderBackend, RenderError, TargetId, Viewport};

//=== Surface =============================================================

#[derive(Debug, Clone)]
struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Surface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let idx = (y * self.width + x) as usize;
        self.pixels[idx] = color.over(self.pixels[idx]);
    }

    /// Pixel range covered by `rect`, clipped to this surface.
    fn clip(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.floor().max(0.0);
        let y0 = rect.y.floor().max(0.0);
        let x1 = (rect.x + rect.width).ceil().min(self.width as f32);
        let y1 = (rect.y + rect.height).ceil().min(self.height as f32);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn fill(&mut self, rect: &Rect, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn composite(&mut self, source: &Surface, quad: &Quad) {
        if quad.opacity <= 0.0 || quad.dest.width <= 0.0 || quad.dest.height <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(&quad.dest) else {
            return;
        };

        let dest = quad.dest;
        for y in y0..y1 {
            let v = (y as f32 + 0.5 - dest.y) / dest.height;
            let sy = ((v * source.height as f32) as u32).min(source.height - 1);
            for x in x0..x1 {
                let u = (x as f32 + 0.5 - dest.x) / dest.width;
                let sx = ((u * source.width as f32) as u32).min(source.width - 1);
                self.blend(x, y, source.get(sx, sy).faded(quad.opacity));
            }
        }
    }
}

//=== SoftwareRenderer ====================================================

/// CPU render backend with an optional cap on off-screen targets.
///
/// The cap exists so that allocation failure can be exercised: once
/// `target_limit` live targets exist, `create_target` reports
/// [`RenderError::TargetLimit`]. Destroyed targets free their slot in the
/// count, but their ids are never handed out again.
#[derive(Debug)]
pub struct SoftwareRenderer {
    back_buffer: Surface,
    targets: Vec<Option<Surface>>,
    bound: Option<TargetId>,
    target_limit: Option<usize>,
}

impl SoftwareRenderer {
    /// Creates a renderer whose back buffer matches `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        debug!("Software renderer created ({}x{})", viewport.width, viewport.height);
        Self {
            back_buffer: Surface::new(viewport.width, viewport.height),
            targets: Vec::new(),
            bound: None,
            target_limit: None,
        }
    }

    /// Caps the number of off-screen targets this renderer will create.
    pub fn with_target_limit(mut self, limit: usize) -> Self {
        self.target_limit = Some(limit);
        self
    }

    /// Number of live off-screen targets.
    pub fn target_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }

    /// Reads one pixel of a target (`None` reads the back buffer).
    pub fn pixel(&self, target: Option<TargetId>, x: u32, y: u32) -> Option<Color> {
        let surface = match target {
            None => &self.back_buffer,
            Some(id) => self.targets.get(id.0 as usize)?.as_ref()?,
        };
        (x < surface.width && y < surface.height).then(|| surface.get(x, y))
    }

    /// Copies the back buffer out for presentation.
    pub fn frame(&self) -> Frame {
        Frame {
            width: self.back_buffer.width,
            height: self.back_buffer.height,
            pixels: self.back_buffer.pixels.iter().map(|c| c.to_xrgb()).collect(),
        }
    }

    fn surface_mut(&mut self, target: Option<TargetId>) -> &mut Surface {
        let slot = target.and_then(|id| self.targets.get_mut(id.0 as usize));
        match slot {
            Some(Some(surface)) => surface,
            _ => &mut self.back_buffer,
        }
    }

    fn check(&self, id: TargetId) -> Result<(), RenderError> {
        match self.targets.get(id.0 as usize) {
            Some(Some(_)) => Ok(()),
            _ => Err(RenderError::UnknownTarget(id)),
        }
    }
}

//--- RenderBackend -------------------------------------------------------

impl RenderBackend for SoftwareRenderer {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.back_buffer.width, self.back_buffer.height)
    }

    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        if let Some(limit) = self.target_limit {
            if self.target_count() >= limit {
                return Err(RenderError::TargetLimit { limit });
            }
        }

        let id = TargetId(self.targets.len() as u32);
        self.targets.push(Some(Surface::new(width, height)));
        trace!("Allocated {} ({}x{})", id, width, height);
        Ok(id)
    }

    fn destroy_target(&mut self, target: TargetId) -> Result<(), RenderError> {
        self.check(target)?;
        self.targets[target.0 as usize] = None;
        if self.bound == Some(target) {
            self.bound = None;
        }
        trace!("Released {}", target);
        Ok(())
    }

    fn bind_target(&mut self, target: Option<TargetId>) -> Result<(), RenderError> {
        if let Some(id) = target {
            self.check(id)?;
        }
        self.bound = target;
        Ok(())
    }

    fn bound_target(&self) -> Option<TargetId> {
        self.bound
    }

    fn clear(&mut self, color: Color) {
        let bound = self.bound;
        self.surface_mut(bound).pixels.fill(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let bound = self.bound;
        self.surface_mut(bound).fill(&rect, color);
    }

    fn draw_target(&mut self, source: TargetId, quad: &Quad) -> Result<(), RenderError> {
        self.check(source)?;
        let src = source.0 as usize;

        match self.bound {
            None => {
                if let Some(surface) = &self.targets[src] {
                    self.back_buffer.composite(surface, quad);
                }
            }
            Some(dst) if dst.0 as usize == src => {
                if let Some(surface) = self.targets[src].as_mut() {
                    let copy = surface.clone();
                    surface.composite(&copy, quad);
                }
            }
            Some(dst) => {
                let dst = dst.0 as usize;
                let (source, dest) = if src < dst {
                    let (lo, hi) = self.targets.split_at_mut(dst);
                    (&lo[src], &mut hi[0])
                } else {
                    let (lo, hi) = self.targets.split_at_mut(src);
                    (&hi[0], &mut lo[dst])
                };
                if let (Some(source), Some(dest)) = (source, dest) {
                    dest.composite(source, quad);
                }
            }
        }
        Ok(())
    }

    fn target_size(&self, target: TargetId) -> Option<(u32, u32)> {
        self.targets
            .get(target.0 as usize)?
            .as_ref()
            .map(|s| (s.width, s.height))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
