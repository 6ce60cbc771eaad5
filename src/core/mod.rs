//! Core transition types and logic.
//!
//! This module contains the pure core of the transition engine:
//! - State names and source specifiers
//! - Call arguments and declared signatures
//! - Guard predicates and handler bodies
//! - Immutable transition descriptors and the algebra that merges them
//!
//! Nothing here touches a record's state field; binding to a record lives
//! in [`crate::bound`].

mod args;
pub mod compose;
mod guard;
mod handler;
mod spec;
mod state;

pub use args::{ArityMismatch, CallArgs, Signature};
pub use guard::{ExtraArg, Guard, Invocation};
pub use handler::{Handler, HandlerCall, HandlerError};
pub use spec::{HandlerKind, Sources, TransitionSpec};
pub use state::{
    display_state, is_valid_source, is_valid_state, Source, SourceSet, StateValue, WILDCARD,
};
