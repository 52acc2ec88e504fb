//=========================================================================
// Render Test Doubles
//=========================================================================
//
// `RecordingRenderer` keeps no pixels. It logs every backend call with
// the target that was bound at the time, so tests can assert on what the
// compositor asked for rather than on what it produced.
//
//=========================================================================

use super::{Color, Quad, Rect, RenderBackend, RenderError, TargetId, Viewport};

//=== Call Log ============================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create(TargetId),
    Destroy(TargetId),
    Bind(Option<TargetId>),
    Clear(Option<TargetId>, Color),
    Fill(Option<TargetId>, Rect),
    Draw { into: Option<TargetId>, source: TargetId, opacity: f32 },
}

//=== RecordingRenderer ===================================================

#[derive(Debug)]
pub(crate) struct RecordingRenderer {
    viewport: Viewport,
    sizes: Vec<Option<(u32, u32)>>,
    bound: Option<TargetId>,
    calls: Vec<Call>,
}

impl RecordingRenderer {
    pub(crate) fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            sizes: Vec::new(),
            bound: None,
            calls: Vec::new(),
        }
    }

    pub(crate) fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of `create_target` calls so far.
    pub(crate) fn created(&self) -> usize {
        self.sizes.len()
    }

    /// Opacities of every quad drawn onto the back buffer, in order.
    pub(crate) fn composite_opacities(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { into: None, opacity, .. } => Some(*opacity),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn reset(&mut self) {
        self.calls.clear();
    }

    fn check(&self, id: TargetId) -> Result<(), RenderError> {
        match self.sizes.get(id.0 as usize) {
            Some(Some(_)) => Ok(()),
            _ => Err(RenderError::UnknownTarget(id)),
        }
    }
}

impl RenderBackend for RecordingRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let id = TargetId(self.sizes.len() as u32);
        self.sizes.push(Some((width, height)));
        self.calls.push(Call::Create(id));
        Ok(id)
    }

    fn destroy_target(&mut self, target: TargetId) -> Result<(), RenderError> {
        self.check(target)?;
        self.sizes[target.0 as usize] = None;
        if self.bound == Some(target) {
            self.bound = None;
        }
        self.calls.push(Call::Destroy(target));
        Ok(())
    }

    fn bind_target(&mut self, target: Option<TargetId>) -> Result<(), RenderError> {
        if let Some(id) = target {
            self.check(id)?;
        }
        self.bound = target;
        self.calls.push(Call::Bind(target));
        Ok(())
    }

    fn bound_target(&self) -> Option<TargetId> {
        self.bound
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(Call::Clear(self.bound, color));
    }

    fn fill_rect(&mut self, rect: Rect, _color: Color) {
        self.calls.push(Call::Fill(self.bound, rect));
    }

    fn draw_target(&mut self, source: TargetId, quad: &Quad) -> Result<(), RenderError> {
        self.check(source)?;
        self.calls.push(Call::Draw {
            into: self.bound,
            source,
            opacity: quad.opacity,
        });
        Ok(())
    }

    fn target_size(&self, target: TargetId) -> Option<(u32, u32)> {
        self.sizes.get(target.0 as usize).copied().flatten()
    }
}
