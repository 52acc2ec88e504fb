//=========================================================================
// Stagehand Engine
//=========================================================================
//
// Process bootstrap: window, clock and the screen manager's thread.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                    │
//         ├─ with_tps()              └─ ScreenManager     ├─ spawns core thread
//         ├─ with_channel_capacity()    (preload screens) ├─ runs platform
//         ├─ with_viewport()                              └─ blocks until exit
//         ├─ with_title()
//         └─ with_fps_overlay()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::content::ContentError;
use crate::core::error::ScreenError;
use crate::core::platform_bridge::{CoreEvent, PlatformError, PlatformEvent};
use crate::core::render::{SoftwareRenderer, Viewport};
use crate::core::screen::ScreenManager;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::{Platform, WindowConfig};

//=== EngineError =========================================================

/// Failures that end [`Engine::run`] or [`Engine::init`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error("content cache initialization failed: {0}")]
    Content(#[from] ContentError),

    #[error("core thread panicked")]
    CorePanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (update/draw ticks per second)
/// - **Channel capacity**: 128 events
/// - **Viewport**: 1280×720
/// - **Title**: "Stagehand"
/// - **FPS overlay**: off
///
/// # Examples
///
/// ```no_run
/// use stagehand::EngineBuilder;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_viewport(800, 600)
///     .build()
///     .init(|manager| {
///         // manager.add(MyScreen::new())?;
///         Ok(())
///     })?
///     .run()?;
/// # Ok::<(), stagehand::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    viewport: Viewport,
    title: String,
    fps_overlay: bool,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            viewport: Viewport::new(1280, 720),
            title: "Stagehand".to_owned(),
            fps_overlay: false,
        }
    }

    /// Sets the tick rate of the core thread.
    ///
    /// Every tick runs one update and one draw of the screen stack, and
    /// every screen sees exactly `1 / tps` seconds of elapsed time.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform ⇄ core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the back-buffer size (also the initial window size).
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Viewport must be non-empty, got {}x{}", width, height);
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Draws the measured frame rate over the top-left corner.
    pub fn with_fps_overlay(mut self, enabled: bool) -> Self {
        self.fps_overlay = enabled;
        self
    }

    /// Builds the engine and its (still empty) screen manager.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, viewport: {}x{})",
            self.tps, self.channel_capacity, self.viewport.width, self.viewport.height
        );

        let mut manager = ScreenManager::new(SoftwareRenderer::new(self.viewport));
        manager.set_fps_overlay(self.fps_overlay);

        Engine {
            manager,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: WindowConfig {
                title: self.title,
                viewport: self.viewport,
            },
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Stagehand runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Core Thread @ TPS)
///   │     └─► ScreenManager: update → draw → frame
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling, Presentation
///
/// Communication: crossbeam channels (PlatformEvent ⇄ CoreEvent)
/// ```
pub struct Engine {
    manager: ScreenManager<SoftwareRenderer>,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives the bootstrap access to the screen manager before the loop
    /// starts: preload content, register screens, push the first ones.
    ///
    /// The content cache is initialized before `init_fn` runs. Any error
    /// is returned as is; a failed preload is usually fatal.
    pub fn init<F>(mut self, init_fn: F) -> Result<Self, EngineError>
    where
        F: FnOnce(&mut ScreenManager<SoftwareRenderer>) -> Result<(), ScreenError>,
    {
        info!("Initializing engine systems");

        self.ensure_content()?;
        init_fn(&mut self.manager)?;

        info!("Engine initialization complete ({} screens)", self.manager.len());
        Ok(self)
    }

    fn ensure_content(&mut self) -> Result<(), ContentError> {
        if self.manager.content().is_initialized() {
            return Ok(());
        }
        self.manager.init_content()
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform ⇄ core channels
    /// 2. Moves the screen manager onto the core thread (fixed TPS)
    /// 3. Runs the platform event loop on this thread
    /// 4. Exit: window closed → channel disconnects → core thread stops,
    ///    or stack drained → `CoreEvent::Shutdown` → event loop exits
    pub fn run(mut self) -> Result<(), EngineError> {
        info!("Starting engine runtime (TPS: {})", self.tps);
        self.ensure_content()?;

        //--- 1. Create communication channels ----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);
        let (core_tx, core_rx): (Sender<CoreEvent>, Receiver<CoreEvent>) =
            bounded(self.channel_capacity);

        //--- 2. Spawn the core thread -------------------------------------
        let orchestrator = CoreSystemsOrchestrator::new(self.manager, self.tps);
        let core_handle = orchestrator.spawn_core_thread(rx, core_tx);
        info!("Core thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, core_rx, self.window);
        let platform_result = platform.run();
        info!("Platform event loop exited");

        //--- 4. Wait for the core thread ----------------------------------
        let core_result = match core_handle.join() {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => {
                error!("Core thread panicked");
                Err(EngineError::CorePanicked)
            }
        };

        platform_result?;
        core_result?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
