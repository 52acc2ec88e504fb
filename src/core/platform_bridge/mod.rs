//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the windowing layer and the core thread.
//
// The core never links against winit types beyond the error it wraps;
// everything it needs arrives as `PlatformEvent`s and everything the
// window must react to leaves as `CoreEvent`s.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::{CoreEvent, PlatformEvent};

pub use interface::PlatformError;
