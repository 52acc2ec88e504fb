//=========================================================================
// Screen Stack
//=========================================================================
//
// Ordered screen storage plus the traversal snapshot.
//
// Architecture:
//   entries: Vec<ScreenEntry>   bottom (background) → top (frontmost)
//   pending: Vec<ScreenId>      copy of the order taken by begin_traversal()
//
// The update pass pops ids off `pending` from the top. Screens added mid
// pass only enter `entries`; screens removed mid pass leave both, so a
// removed screen is never visited again in the same frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::transition::Transition;
use super::{Screen, ScreenId};
use crate::core::error::InvalidState;

//=== ScreenEntry =========================================================

/// A screen together with the transition state the stack tracks for it.
pub struct ScreenEntry {
    pub id: ScreenId,
    pub screen: Box<dyn Screen>,
    pub transition: Transition,
}

impl ScreenEntry {
    pub fn new(id: ScreenId, screen: Box<dyn Screen>) -> Self {
        let transition = Transition::new(screen.transition_on_time(), screen.transition_off_time());
        Self {
            id,
            screen,
            transition,
        }
    }
}

impl std::fmt::Debug for ScreenEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenEntry")
            .field("id", &self.id)
            .field("screen", &self.screen.name())
            .field("transition", &self.transition)
            .finish()
    }
}

//=== ScreenStack =========================================================

#[derive(Debug, Default)]
pub struct ScreenStack {
    entries: Vec<ScreenEntry>,
    pending: Vec<ScreenId>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Mutation ---------------------------------------------------------

    /// Pushes an entry on top. Rejects an id that is already present.
    pub fn push(&mut self, entry: ScreenEntry) -> Result<(), InvalidState> {
        if self.contains(entry.id) {
            return Err(InvalidState::AlreadyPresent(entry.id));
        }
        debug!("Pushing {} ({}) at depth {}", entry.id, entry.screen.name(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Removes an entry from the stack and from the pending traversal.
    pub fn remove(&mut self, id: ScreenId) -> Result<ScreenEntry, InvalidState> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(InvalidState::NotOwned(id))?;

        self.pending.retain(|&p| p != id);
        Ok(self.entries.remove(pos))
    }

    //--- Traversal --------------------------------------------------------

    /// Snapshots the current order for a top-down pass.
    pub fn begin_traversal(&mut self) {
        self.pending.clear();
        self.pending.extend(self.entries.iter().map(|e| e.id));
    }

    /// Next (topmost) id still pending in this traversal.
    pub fn next_pending(&mut self) -> Option<ScreenId> {
        self.pending.pop()
    }

    pub fn pending(&self) -> &[ScreenId] {
        &self.pending
    }

    //--- Queries ----------------------------------------------------------

    pub fn get(&self, id: ScreenId) -> Option<&ScreenEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut ScreenEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Ids bottom to top.
    pub fn ids(&self) -> Vec<ScreenId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Entries bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ScreenEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut ScreenEntry> {
        self.entries.iter_mut()
    }

    pub fn top(&self) -> Option<&ScreenEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
