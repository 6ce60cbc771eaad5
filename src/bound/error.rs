//! Errors returned by bound transitions.

use crate::builder::error::SetupError;
use crate::core::HandlerError;
use thiserror::Error;

/// Failure of a transition attempt on a record.
///
/// Except for [`TransitionError::Handler`], the record's state is untouched
/// and no notification fired.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("Unable to switch from {current} using '{transition}'")]
    InvalidSourceState { transition: String, current: String },

    #[error("Preconditions are not satisfied for '{transition}'")]
    PreconditionFailed { transition: String },

    #[error("Handler of '{transition}' failed: {source}")]
    Handler {
        transition: String,
        #[source]
        source: HandlerError,
    },

    #[error("No transition named '{name}'")]
    UnknownTransition { name: String },
}

impl TransitionError {
    /// Whether the caller may recover (by checking `can_proceed` first).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TransitionError::InvalidSourceState { .. } | TransitionError::PreconditionFailed { .. }
        )
    }

    pub fn as_setup(&self) -> Option<&SetupError> {
        match self {
            TransitionError::Setup(err) => Some(err),
            _ => None,
        }
    }
}
