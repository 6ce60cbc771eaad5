//! Transitions bound to concrete records.
//!
//! This is the imperative shell around [`crate::core`]: it reads the
//! record's state, evaluates guards with real call arguments, runs
//! handlers, writes the new state and notifies listeners.

pub mod error;
pub(crate) mod node;
mod transition;

pub use error::TransitionError;
pub use transition::BoundTransition;
