//=========================================================================
// Content Cache
//=========================================================================
//
// Process-scoped texture table with an explicit lifecycle.
//
// Lifecycle:
//   ContentCache::new() → init(renderer) → insert/create/texture → shutdown()
//
// The cache is owned by the screen manager and handed to screens through
// their hook contexts. There is no global lookup.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::render::{Color, RenderBackend, RenderError, Texture};

//=== ContentError ========================================================

/// Failures while loading or looking up content.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("content cache used before init()")]
    NotInitialized,

    #[error("missing texture `{0}`")]
    MissingTexture(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A screen loaded on behalf of another one (e.g. a preview) failed.
    #[error("nested screen `{screen}` failed to load")]
    Nested {
        screen: String,
        #[source]
        source: Box<ContentError>,
    },
}

//=== ContentCache ========================================================

/// Name of the 1x1 white texture created by [`ContentCache::init`].
pub const BLANK_TEXTURE: &str = "blank";

/// Named textures shared by every screen.
#[derive(Debug, Default)]
pub struct ContentCache {
    textures: HashMap<String, Texture>,
    initialized: bool,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Creates the built-in textures. Calling it twice is a no-op.
    pub fn init(&mut self, renderer: &mut dyn RenderBackend) -> Result<(), ContentError> {
        if self.initialized {
            warn!("Content cache already initialized");
            return Ok(());
        }

        self.initialized = true;
        self.create_texture(renderer, BLANK_TEXTURE, 1, 1, Color::WHITE)?;
        debug!("Content cache initialized");
        Ok(())
    }

    /// Drops every texture handle and returns to the uninitialized state.
    pub fn shutdown(&mut self) {
        debug!("Content cache shut down ({} textures released)", self.textures.len());
        self.textures.clear();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    //--- Textures ---------------------------------------------------------

    /// Stores an existing texture under `name`, replacing any previous one.
    pub fn insert_texture(&mut self, name: impl Into<String>, texture: Texture) -> Result<(), ContentError> {
        if !self.initialized {
            return Err(ContentError::NotInitialized);
        }

        let name = name.into();
        if self.textures.insert(name.clone(), texture).is_some() {
            warn!("Texture `{}` was already loaded and has been replaced", name);
        }
        Ok(())
    }

    /// Allocates a `width`×`height` texture filled with `color`.
    pub fn create_texture(
        &mut self,
        renderer: &mut dyn RenderBackend,
        name: &str,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<Texture, ContentError> {
        self.paint_texture(renderer, name, width, height, |r| r.clear(color))
    }

    /// Allocates a texture and lets `paint` draw into it.
    ///
    /// The previously bound target is restored afterwards.
    pub fn paint_texture<F>(
        &mut self,
        renderer: &mut dyn RenderBackend,
        name: &str,
        width: u32,
        height: u32,
        paint: F,
    ) -> Result<Texture, ContentError>
    where
        F: FnOnce(&mut dyn RenderBackend),
    {
        if !self.initialized {
            return Err(ContentError::NotInitialized);
        }

        let target = renderer.create_target(width, height)?;
        let previous = renderer.bound_target();

        renderer.bind_target(Some(target))?;
        paint(&mut *renderer);
        renderer.bind_target(previous)?;

        let texture = Texture { target, width, height };
        self.insert_texture(name, texture)?;
        Ok(texture)
    }

    /// Looks up a texture by name.
    pub fn texture(&self, name: &str) -> Result<Texture, ContentError> {
        if !self.initialized {
            return Err(ContentError::NotInitialized);
        }
        self.textures
            .get(name)
            .copied()
            .ok_or_else(|| ContentError::MissingTexture(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{SoftwareRenderer, Viewport};

    fn renderer() -> SoftwareRenderer {
        SoftwareRenderer::new(Viewport::new(4, 4))
    }

    #[test]
    fn lookups_before_init_fail() {
        let cache = ContentCache::new();
        assert_eq!(cache.texture(BLANK_TEXTURE), Err(ContentError::NotInitialized));
    }

    #[test]
    fn init_creates_blank_texture() {
        let mut r = renderer();
        let mut cache = ContentCache::new();

        cache.init(&mut r).unwrap();

        let blank = cache.texture(BLANK_TEXTURE).unwrap();
        assert_eq!((blank.width, blank.height), (1, 1));
        assert_eq!(r.pixel(Some(blank.target), 0, 0), Some(Color::WHITE));
        assert!(cache.is_initialized());
    }

    #[test]
    fn init_twice_is_noop() {
        let mut r = renderer();
        let mut cache = ContentCache::new();
        cache.init(&mut r).unwrap();
        cache.init(&mut r).unwrap();
        assert_eq!(r.target_count(), 1);
    }

    #[test]
    fn missing_texture_is_reported_by_name() {
        let mut r = renderer();
        let mut cache = ContentCache::new();
        cache.init(&mut r).unwrap();

        assert_eq!(
            cache.texture("logo"),
            Err(ContentError::MissingTexture("logo".into()))
        );
    }

    #[test]
    fn paint_restores_bound_target() {
        let mut r = renderer();
        let mut cache = ContentCache::new();
        cache.init(&mut r).unwrap();

        let outer = r.create_target(2, 2).unwrap();
        r.bind_target(Some(outer)).unwrap();

        let logo = cache
            .paint_texture(&mut r, "logo", 2, 2, |r| r.clear(Color::BLACK))
            .unwrap();

        assert_eq!(r.bound_target(), Some(outer));
        assert_eq!(r.pixel(Some(logo.target), 1, 1), Some(Color::BLACK));
        assert!(cache.contains("logo"));
    }

    #[test]
    fn create_propagates_render_errors() {
        let mut r = renderer().with_target_limit(1);
        let mut cache = ContentCache::new();
        cache.init(&mut r).unwrap();

        let err = cache.create_texture(&mut r, "extra", 2, 2, Color::WHITE);
        assert_eq!(err, Err(ContentError::Render(RenderError::TargetLimit { limit: 1 })));
    }

    #[test]
    fn shutdown_clears_everything() {
        let mut r = renderer();
        let mut cache = ContentCache::new();
        cache.init(&mut r).unwrap();

        cache.shutdown();

        assert!(cache.is_empty());
        assert!(!cache.is_initialized());
        assert_eq!(cache.texture(BLANK_TEXTURE), Err(ContentError::NotInitialized));
    }
}
