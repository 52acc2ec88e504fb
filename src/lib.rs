//=========================================================================
// Stagehand Library Root
//
// A stack of navigable screens with timed on/off transitions, input focus
// routing and off-screen transition compositing.
//
// Responsibilities:
// - Expose the bootstrap (`EngineBuilder`, `Engine`)
// - Expose the screen stack (`core::screen`) and its collaborators
// - Keep the winit integration (`platform`) hidden from applications
//
// Typical usage:
// ```no_run
// use stagehand::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::new()
//         .build()
//         .init(|manager| {
//             manager.add(BackgroundScreen::new())?;
//             Ok(())
//         })?
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs on the core thread: screen stack,
// input routing, rendering backend and content cache. Applications use it
// to write their own screens and, in tests, to drive a `ScreenManager`
// without a window.
//
// `screens` holds ready-made screens (background, logo, menu, ...).
//
pub mod core;
pub mod prelude;
pub mod screens;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the OS window and winit event loop and is not part of
// the public API surface.
//
// `engine` wires the platform and the core thread together.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
