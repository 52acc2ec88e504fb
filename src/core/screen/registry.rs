//=========================================================================
// Screen Registry
//=========================================================================
//
// Explicit catalogue of constructible screens.
//
// The bootstrap registers one factory per demo scene; the menu enumerates
// the registry in registration order to build its entries and previews.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::Screen;

//=== ScreenTemplate ======================================================

/// Constructor for a fresh screen instance.
pub type ScreenFactory = Box<dyn Fn() -> Box<dyn Screen> + Send>;

/// One registered screen: menu label, optional details text, factory.
pub struct ScreenTemplate {
    pub key: String,
    pub title: String,
    pub details: Option<String>,
    factory: ScreenFactory,
}

impl ScreenTemplate {
    /// Builds a new instance of the registered screen.
    pub fn create(&self) -> Box<dyn Screen> {
        (self.factory)()
    }
}

impl std::fmt::Debug for ScreenTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenTemplate")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}

//=== ScreenRegistry ======================================================

/// Ordered map of key → [`ScreenTemplate`].
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    templates: Vec<ScreenTemplate>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `key`. Re-registering a key replaces the
    /// previous template in place.
    pub fn register<F, S>(&mut self, key: &str, title: &str, factory: F) -> &mut Self
    where
        F: Fn() -> S + Send + 'static,
        S: Screen + 'static,
    {
        let template = ScreenTemplate {
            key: key.to_owned(),
            title: title.to_owned(),
            details: None,
            factory: Box::new(move || Box::new(factory()) as Box<dyn Screen>),
        };

        match self.templates.iter_mut().find(|t| t.key == key) {
            Some(existing) => {
                warn!("Screen `{}` was already registered and has been replaced", key);
                *existing = template;
            }
            None => {
                debug!("Registered screen `{}`", key);
                self.templates.push(template);
            }
        }
        self
    }

    /// Attaches a details text to an already registered key.
    pub fn with_details(&mut self, key: &str, details: &str) -> &mut Self {
        match self.templates.iter_mut().find(|t| t.key == key) {
            Some(template) => template.details = Some(details.to_owned()),
            None => warn!("Details for unregistered screen `{}` ignored", key),
        }
        self
    }

    /// Creates an instance of the screen registered under `key`.
    pub fn create(&self, key: &str) -> Option<Box<dyn Screen>> {
        self.get(key).map(ScreenTemplate::create)
    }

    pub fn get(&self, key: &str) -> Option<&ScreenTemplate> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Templates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ScreenTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
