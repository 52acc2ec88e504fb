//=========================================================================
// Event Collector
//=========================================================================
//
// The core thread's end of the platform channel.
//
// Each tick starts with `collect_frame()`: whatever the window sent since
// the previous tick becomes this tick's input batches and window focus.
// At most `FRAME_BUDGET` messages are taken per tick; the rest wait for
// the next one, so a burst of input delays the stack by whole ticks
// instead of stretching a single tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::event::InputEvent;

const FRAME_BUDGET: usize = 100;

//=== TickControl =========================================================

/// Whether the core loop should run another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    inbox: Receiver<PlatformEvent>,
    batches: Vec<Vec<InputEvent>>,
    focused: bool,
}

impl EventCollector {
    /// The window is assumed focused until it says otherwise.
    pub(crate) fn new(inbox: Receiver<PlatformEvent>) -> Self {
        Self {
            inbox,
            batches: Vec::new(),
            focused: true,
        }
    }

    /// Takes this tick's messages. `Exit` once the window closed or the
    /// platform side hung up.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.batches.clear();

        for taken in 0..FRAME_BUDGET {
            let event = match self.inbox.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return TickControl::Continue,
                Err(TryRecvError::Disconnected) => {
                    debug!("Platform channel disconnected after {} messages", taken);
                    return TickControl::Exit;
                }
            };
            if self.accept(event) == TickControl::Exit {
                return TickControl::Exit;
            }
        }

        warn!(
            "Input backlog: {} messages taken this tick, {} left queued",
            FRAME_BUDGET,
            self.inbox.len()
        );
        TickControl::Continue
    }

    /// Input batches in arrival order; empty halves are skipped.
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.batches
    }

    pub(crate) fn window_focused(&self) -> bool {
        self.focused
    }

    fn accept(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                self.batches
                    .extend([discrete, continuous].into_iter().filter(|batch| !batch.is_empty()));
            }
            PlatformEvent::Focused(focused) => {
                debug!("Window focus: {}", focused);
                self.focused = focused;
            }
            PlatformEvent::WindowClosed => return TickControl::Exit,
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use crossbeam_channel::{unbounded, Sender};

    fn channel() -> (Sender<PlatformEvent>, EventCollector) {
        let (tx, rx) = unbounded();
        (tx, EventCollector::new(rx))
    }

    fn keys(keys: &[KeyCode]) -> PlatformEvent {
        PlatformEvent::Inputs {
            discrete: keys
                .iter()
                .map(|&key| InputEvent::KeyDown {
                    key,
                    modifiers: Modifiers::NONE,
                })
                .collect(),
            continuous: vec![],
        }
    }

    #[test]
    fn quiet_tick_has_no_batches() {
        let (_tx, mut collector) = channel();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.batches().is_empty());
        assert!(collector.window_focused());
    }

    #[test]
    fn discrete_and_continuous_halves_become_separate_batches() {
        let (tx, mut collector) = channel();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown {
                key: KeyCode::Escape,
                modifiers: Modifiers::NONE,
            }],
            continuous: vec![InputEvent::MouseMoved { x: 4.0, y: 2.0 }],
        })
        .unwrap();
        tx.send(keys(&[KeyCode::Enter, KeyCode::Space])).unwrap();

        collector.collect_frame();

        let sizes: Vec<_> = collector.batches().iter().map(Vec::len).collect();
        assert_eq!(sizes, [1, 1, 2]);
    }

    #[test]
    fn batches_last_one_tick() {
        let (tx, mut collector) = channel();
        tx.send(keys(&[KeyCode::ArrowDown])).unwrap();

        collector.collect_frame();
        collector.collect_frame();

        assert!(collector.batches().is_empty());
    }

    #[test]
    fn focus_sticks_until_reported_again() {
        let (tx, mut collector) = channel();

        tx.send(PlatformEvent::Focused(false)).unwrap();
        collector.collect_frame();
        collector.collect_frame();
        assert!(!collector.window_focused());

        tx.send(PlatformEvent::Focused(true)).unwrap();
        collector.collect_frame();
        assert!(collector.window_focused());
    }

    #[test]
    fn backlog_spills_into_the_next_tick() {
        let (tx, mut collector) = channel();
        for _ in 0..FRAME_BUDGET + 20 {
            tx.send(keys(&[KeyCode::KeyS])).unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.batches().len(), FRAME_BUDGET);

        collector.collect_frame();
        assert_eq!(collector.batches().len(), 20);
    }

    #[test]
    fn close_or_hang_up_ends_the_loop() {
        let (tx, mut collector) = channel();
        tx.send(keys(&[KeyCode::KeyA])).unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();
        assert_eq!(collector.collect_frame(), TickControl::Exit);

        let (tx, mut collector) = channel();
        drop(tx);
        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
