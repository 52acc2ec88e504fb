//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Bridges winit (OS window and input) with the core thread.
//
// Architecture:
// ```text
//  Main Thread:                      Core Thread:
//  ┌──────────────────────────┐     ┌────────────────────────┐
//  │  Winit Event Loop        │     │  EventCollector        │
//  │   ↓                      │     │   ↓                    │
//  │  InputProcessor          │     │  InputRouter           │
//  │   ├─ Converts Winit      │     │   ↓                    │
//  │   ├─ Tracks modifiers    │     │  ScreenManager         │
//  │   └─ Scales cursor       │     │   ├─ update()          │
//  │   ↓                      │     │   └─ draw()            │
//  │  InputBuffer             │     │                        │
//  │   ├─ discrete: Vec<>     │     └────────────────────────┘
//  │   └─ continuous: Set<>   │          ↑            │
//  │   ↓                      │          │            │
//  │  RedrawRequested         ├──────────┘            │
//  │   ├─ flush input         │   PlatformEvent       │
//  │   └─ Presenter::present  │                       │
//  │                          │                       │
//  │  about_to_wait           │◄──────────────────────┘
//  │   ├─ frame → Presenter   │   CoreEvent
//  │   ├─ cursor visibility   │
//  │   └─ shutdown            │
//  └──────────────────────────┘
// ```
//
// Frame boundary: RedrawRequested. All buffered input is sent as one
// batch; empty frames send nothing. The newest frame from the core thread
// is blitted to the window through softbuffer, scaled to its size. Focus changes and window close are
// forwarded as they happen.
//
// Input sent after the core thread is gone is dropped with a warning; the
// window closes on the next about_to_wait.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;
mod presenter;

//=== External Crates =====================================================

use std::rc::Rc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{CoreEvent, PlatformError, PlatformEvent};
use crate::core::render::Viewport;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;
use presenter::Presenter;

//=== WindowConfig ========================================================

/// Window settings handed down from the engine builder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub viewport: Viewport,
}

//=== Platform ============================================================

/// Window owner and input forwarder. Lives on the main thread.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called). Shared with the
    /// presentation surface.
    window: Option<Rc<Window>>,

    presenter: Presenter,

    config: WindowConfig,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    /// Channel to the core thread.
    event_sender: Sender<PlatformEvent>,

    /// Channel from the core thread.
    core_events: Receiver<CoreEvent>,

    input_processor: InputProcessor,

    cursor_visible: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates the platform. The window itself appears in `resumed()`.
    pub fn new(
        event_sender: Sender<PlatformEvent>,
        core_events: Receiver<CoreEvent>,
        config: WindowConfig,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        let input_processor = InputProcessor::new(config.viewport);
        Self {
            window: None,
            presenter: Presenter::new(),
            config,
            buffer: InputBuffer::new(),
            event_sender,
            core_events,
            input_processor,
            cursor_visible: true,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes or the core
    /// thread asks for shutdown.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms where winit
    /// requires it (macOS, iOS).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends this frame's input to the core thread.
    ///
    /// A disconnected channel drops the events with a warning; the core
    /// thread reports its own exit.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            let discrete_count = discrete.len();
            let continuous_count = continuous.len();

            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );

            if self.event_sender.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    discrete_count + continuous_count
                );
            }
        }
    }

    /// Applies everything the core thread sent since the last call.
    /// Returns false once the platform should stop.
    fn drain_core_events(&mut self) -> bool {
        loop {
            match self.core_events.try_recv() {
                Ok(CoreEvent::Present(frame)) => self.presenter.submit(frame),
                Ok(CoreEvent::CursorVisible(visible)) => {
                    self.cursor_visible = visible;
                    if let Some(window) = &self.window {
                        window.set_cursor_visible(visible);
                    }
                }
                Ok(CoreEvent::Shutdown) => {
                    info!(target: "platform", "Core requested shutdown");
                    return false;
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    info!(target: "platform", "Core thread gone, closing window");
                    return false;
                }
            }
        }
    }

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            debug!(target: "platform", "Core channel closed");
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.viewport.width, self.config.viewport.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.input_processor.set_window_size(size.width, size.height);
                window.set_cursor_visible(self.cursor_visible);

                let window = Rc::new(window);
                if let Err(e) = self.presenter.attach(&window) {
                    error!(target: "platform", "Presentation surface creation failed: {}", e);
                    self.send(PlatformEvent::WindowClosed);
                    event_loop.exit();
                    return;
                }

                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                debug!(target: "platform", "Window focus changed: {}", focused);
                self.flush_input_buffer();
                self.send(PlatformEvent::Focused(*focused));
            }

            WindowEvent::Resized(size) => {
                self.input_processor.set_window_size(size.width, size.height);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.set_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .translate_cursor(position.x as f32, position.y as f32);
                self.buffer.push(event);
            }

            WindowEvent::CursorLeft { .. } => {
                self.buffer.cursor_left();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.translate_key(key_event) {
                    self.buffer.push(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.translate_button(*button, *state);
                self.buffer.push(event);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush all buffered input
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    if let Err(e) = self.presenter.present(size.width, size.height) {
                        warn!(target: "platform", "Frame presentation failed: {}", e);
                    }
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.drain_core_events() {
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
