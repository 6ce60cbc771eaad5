//! Configuration errors raised while declaring or binding transitions.

use std::fmt;
use thiserror::Error;

/// A declaration mistake. Never retried; surfaces at registry build or
/// bind time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SetupError {
    #[error("Invalid source state {value:?}")]
    InvalidSource { value: String },

    #[error("Invalid target state {value:?}")]
    InvalidTarget { value: String },

    #[error("Source state list is empty")]
    EmptySources,

    #[error("Transition '{transition}' has no target state")]
    MissingTarget { transition: String },

    #[error("No FSM state field found in record {record}")]
    NoStateField { record: &'static str },

    #[error("More than one FSM state field found in record {record} ({fields:?})")]
    MultipleStateFields {
        record: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("Source state superset {parent} and subset {child} are not compatible")]
    IncompatibleSources { parent: String, child: String },

    #[error("Targets {parent:?} and {child:?} are not compatible")]
    IncompatibleTargets {
        parent: Option<String>,
        child: Option<String>,
    },

    #[error("Handler group '{group}' resolves to several targets {targets:?}")]
    ConflictingTargets { group: String, targets: Vec<String> },

    #[error("Handler group '{group}' has no member transitions")]
    EmptyGroup { group: String },

    #[error("Can transition with multiple handlers ({handlers:?})")]
    AmbiguousHandlers { handlers: Vec<String> },

    #[error("Mismatch between args accepted by preconditions and handler '{handler}': {detail}")]
    ArityMismatch { handler: String, detail: String },

    #[error("Transition '{name}' is declared more than once")]
    DuplicateTransition { name: String },
}

/// Every configuration error found while building a registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupErrors(pub Vec<SetupError>);

impl SetupErrors {
    pub fn single(error: SetupError) -> Self {
        SetupErrors(vec![error])
    }

    pub fn errors(&self) -> &[SetupError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<SetupError> for SetupErrors {
    fn from(error: SetupError) -> Self {
        Self::single(error)
    }
}

impl fmt::Display for SetupErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} setup error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SetupErrors {}
