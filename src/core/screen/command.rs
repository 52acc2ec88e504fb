//=========================================================================
// Screen Commands
//=========================================================================
//
// Stack mutations requested from inside a screen hook.
//
// A hook cannot touch the stack while the manager is iterating it, so it
// queues commands here instead. The manager drains the queue right after
// the hook returns, which makes the mutation visible to the rest of the
// same traversal.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Screen, ScreenId};

//=== ScreenCommand =======================================================

pub enum ScreenCommand {
    /// Push a new screen on top.
    Add(Box<dyn Screen>),

    /// Evict immediately (unload, no off transition).
    Remove(ScreenId),

    /// Begin the off transition.
    Exit(ScreenId),

    /// Exit every screen.
    ExitGame,
}

impl std::fmt::Debug for ScreenCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add(screen) => write!(f, "Add({})", screen.name()),
            Self::Remove(id) => write!(f, "Remove({})", id),
            Self::Exit(id) => write!(f, "Exit({})", id),
            Self::ExitGame => f.write_str("ExitGame"),
        }
    }
}

//=== CommandQueue ========================================================

/// FIFO of pending [`ScreenCommand`]s.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: Vec<ScreenCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: ScreenCommand) {
        self.queue.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes every queued command, leaving the queue empty.
    pub fn take(&mut self) -> Vec<ScreenCommand> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
