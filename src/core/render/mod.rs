//=========================================================================
// Rendering Capability
//=========================================================================
//
// The narrow slice of a graphics API the screen stack depends on.
//
// Architecture:
//   ScreenManager ──draw()──> TransitionCompositor ──> dyn RenderBackend
//                                  │                       ├─ create/destroy_target()
//                                  └─ SlotPool             ├─ bind_target()
//                                                          ├─ clear() / fill_rect()
//                                                          └─ draw_target()
//
// The core never talks to a GPU directly. Any backend able to allocate
// off-screen color targets, bind them, clear them and draw them back as a
// textured quad can host the stack. `SoftwareRenderer` is the in-tree
// implementation.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod compositor;
pub mod overlay;
mod software;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use compositor::{render_preview, SlotLease, SlotPool, TransitionCompositor, TransitionEffect};
pub use overlay::FpsCounter;
pub use software::SoftwareRenderer;

//=== Color ===============================================================

/// Straight-alpha RGBA color with `f32` channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Returns the same color with its alpha multiplied by `factor`.
    pub fn faded(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Composites `self` over `dst` ("source over" with straight alpha).
    pub fn over(self, dst: Self) -> Self {
        let out_a = self.a + dst.a * (1.0 - self.a);
        if out_a <= f32::EPSILON {
            return Self::TRANSPARENT;
        }

        let blend = |s: f32, d: f32| (s * self.a + d * dst.a * (1.0 - self.a)) / out_a;

        Self {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a: out_a,
        }
    }

    /// Packs the color as `0x00RRGGBB`, composited over black.
    pub fn to_xrgb(self) -> u32 {
        let alpha = self.a.clamp(0.0, 1.0);
        let channel = |c: f32| ((c * alpha).clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Linear interpolation between two colors.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

//=== Geometry ============================================================

/// Axis-aligned rectangle in pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds a rectangle of the given size centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x
            && point.1 >= self.y
            && point.0 < self.x + self.width
            && point.1 < self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Size of the back buffer the stack composites into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        self.bounds().contains(point)
    }
}

//=== Targets & Textures ==================================================

/// Handle to an off-screen color target owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) u32);

impl TargetId {
    /// Raw index, mostly useful in logs.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// A drawable image: a backend target plus its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    pub target: TargetId,
    pub width: u32,
    pub height: u32,
}

/// Placement of a textured quad on the currently bound target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Destination rectangle; the source is stretched to fit.
    pub dest: Rect,

    /// Opacity multiplier applied to every source pixel.
    pub opacity: f32,
}

impl Quad {
    pub fn new(dest: Rect, opacity: f32) -> Self {
        Self {
            dest,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

//=== Frame ===============================================================

/// A finished back buffer on its way to the window.
///
/// One `0x00RRGGBB` word per pixel, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

//=== RenderError =========================================================

/// Failures reported by a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The backend cannot allocate any more off-screen targets.
    #[error("render target limit of {limit} reached")]
    TargetLimit { limit: usize },

    /// A target was requested with a zero dimension.
    #[error("invalid render target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// A handle that this backend never issued (or already dropped).
    #[error("unknown render target {0}")]
    UnknownTarget(TargetId),
}

//=== RenderBackend =======================================================

/// Capability set the screen stack needs from a graphics backend.
///
/// Drawing operations apply to the currently bound target; `None` binds
/// the back buffer.
pub trait RenderBackend {
    /// Size of the back buffer.
    fn viewport(&self) -> Viewport;

    /// Allocates a new off-screen color target, initially transparent.
    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, RenderError>;

    /// Releases an off-screen target. The handle becomes unknown to every
    /// other call; if it was bound, the back buffer is bound instead.
    fn destroy_target(&mut self, target: TargetId) -> Result<(), RenderError>;

    /// Makes `target` the destination of subsequent drawing.
    fn bind_target(&mut self, target: Option<TargetId>) -> Result<(), RenderError>;

    /// Currently bound target (`None` is the back buffer).
    fn bound_target(&self) -> Option<TargetId>;

    /// Fills the whole bound target with `color` (no blending).
    fn clear(&mut self, color: Color);

    /// Blends a solid rectangle onto the bound target.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Blends the contents of `source` onto the bound target.
    fn draw_target(&mut self, source: TargetId, quad: &Quad) -> Result<(), RenderError>;

    /// Dimensions of a previously created target.
    fn target_size(&self, target: TargetId) -> Option<(u32, u32)>;
}

//=========================================================================
// Unit Tests
//=========================================================================
