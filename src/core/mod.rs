//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Everything that runs on the core (non-platform) thread.
//
// Architecture:
//   Platform thread ──PlatformEvent──> EventCollector
//                                          │
//   CoreSystemsOrchestrator::tick()        ▼
//     ├─ InputRouter::poll(batches)    (window focus, snapshot)
//     ├─ ScreenManager::update(time)   (transitions, hooks, focus)
//     ├─ ScreenManager::draw(time)     (compositor → SoftwareRenderer)
//     └─ CoreEvent ──> Platform        (frame, cursor visibility, shutdown)
//
// A frame is only sent when the platform has drained everything sent
// before it, so a slow window drops frames instead of queueing them.
//
// The screen stack, renderer and content cache are created on the main
// thread during `Engine::init` and then moved here for good. Nothing in
// them is shared; the channel is the only link to the window.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod content;
pub mod error;
pub mod input;
pub mod platform_bridge;
pub mod render;
pub mod screen;

//=== External Dependencies ===============================================

use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use log::{error, info, trace, warn};

//=== Internal Dependencies ===============================================

use clock::FrameClock;
use error::ScreenError;
use platform_bridge::{CoreEvent, EventCollector, PlatformEvent, TickControl};
use render::SoftwareRenderer;
use screen::ScreenManager;

//=== CoreSystemsOrchestrator =============================================

/// Owns the screen manager and drives it at a fixed tick rate.
pub(crate) struct CoreSystemsOrchestrator {
    manager: ScreenManager<SoftwareRenderer>,
    clock: FrameClock,
    cursor_visible: bool,
    last_tick: Option<Instant>,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(manager: ScreenManager<SoftwareRenderer>, tps: f64) -> Self {
        Self {
            manager,
            clock: FrameClock::new(tps),
            cursor_visible: false,
            last_tick: None,
        }
    }

    pub(crate) fn manager_mut(&mut self) -> &mut ScreenManager<SoftwareRenderer> {
        &mut self.manager
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one frame: input, update, draw, notify the platform.
    ///
    /// Recoverable screen errors are logged and the frame goes on; any
    /// other error is returned and ends the core thread.
    pub(crate) fn tick(
        &mut self,
        collector: &mut EventCollector,
        outbox: &Sender<CoreEvent>,
    ) -> Result<TickControl, ScreenError> {
        //--- Step 1: Gather platform events ------------------------------
        if collector.collect_frame() == TickControl::Exit {
            info!("Platform closed, core thread exiting");
            return Ok(TickControl::Exit);
        }

        let focused = collector.window_focused();
        let input = self.manager.input_mut();
        input.set_window_focus(focused);
        input.poll(collector.batches());

        //--- Step 2: Update and draw the stack ---------------------------
        let time = self.clock.advance();

        let now = Instant::now();
        if let Some(previous) = self.last_tick.replace(now) {
            self.manager.record_frame(now - previous);
        }

        if let Err(err) = self.manager.update(time, focused) {
            if !err.is_recoverable() {
                return Err(err);
            }
            warn!("Screen update failed: {}", err);
        }
        self.manager.draw(time)?;

        //--- Step 3: Report back to the platform -------------------------
        if outbox.is_empty() {
            let _ = outbox.try_send(CoreEvent::Present(self.manager.renderer().frame()));
        } else {
            trace!("Platform behind, frame {} not presented", self.clock.ticks());
        }

        let cursor = self.manager.input().cursor_visible();
        if cursor != self.cursor_visible {
            self.cursor_visible = cursor;
            let _ = outbox.send(CoreEvent::CursorVisible(cursor));
        }

        if self.manager.is_exit_complete() {
            info!("Screen stack drained, requesting shutdown");
            let _ = outbox.send(CoreEvent::Shutdown);
            return Ok(TickControl::Exit);
        }

        Ok(TickControl::Continue)
    }

    //--- spawn_core_thread() ---------------------------------------------

    /// Moves the orchestrator onto its own thread and ticks it at the
    /// configured rate until the platform closes or the stack drains.
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        outbox: Sender<CoreEvent>,
    ) -> thread::JoinHandle<Result<(), ScreenError>> {
        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);

            let result = loop {
                let frame_start = Instant::now();

                match self.tick(&mut collector, &outbox) {
                    Ok(TickControl::Continue) => {}
                    Ok(TickControl::Exit) => break Ok(()),
                    Err(err) => {
                        error!("Core thread failed: {}", err);
                        let _ = outbox.send(CoreEvent::Shutdown);
                        break Err(err);
                    }
                }

                self.clock.pace(frame_start);
            };

            self.manager.shutdown();
            info!("Core thread stopped after {} ticks", self.clock.ticks());
            result
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
