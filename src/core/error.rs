//=========================================================================
// Screen Errors
//=========================================================================
//
// Error taxonomy of the screen stack.
//
//   InvalidState        misuse of the stack API (unknown id, double add)
//   ResourceExhaustion  off-screen target allocation failed
//   ContentLoadFailure  a screen's load hook failed; it was not added
//   Render              any other backend failure during a draw
//
// Nothing in the stack retries. Every error is returned to the caller of
// the operation that produced it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::content::ContentError;
use crate::core::render::RenderError;
use crate::core::screen::ScreenId;

//=== InvalidState ========================================================

/// Programming errors against the stack API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidState {
    /// The id does not name a screen currently owned by the stack.
    #[error("screen {0} is not owned by the stack")]
    NotOwned(ScreenId),

    /// A screen with this id is already on the stack.
    #[error("screen {0} is already on the stack")]
    AlreadyPresent(ScreenId),
}

//=== ScreenError =========================================================

/// Errors surfaced by [`ScreenManager`](crate::core::screen::ScreenManager).
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error(transparent)]
    InvalidState(#[from] InvalidState),

    /// Fatal: rendering cannot proceed without the target.
    #[error("transition target allocation failed: {0}")]
    ResourceExhaustion(#[source] RenderError),

    #[error("screen `{screen}` failed to load content")]
    ContentLoadFailure {
        screen: String,
        #[source]
        source: ContentError,
    },

    #[error("render failure: {0}")]
    Render(#[source] RenderError),
}

impl From<RenderError> for ScreenError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::TargetLimit { .. } => Self::ResourceExhaustion(err),
            other => Self::Render(other),
        }
    }
}

impl ScreenError {
    /// True for errors that leave the stack itself untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidState(_) | Self::ContentLoadFailure { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
