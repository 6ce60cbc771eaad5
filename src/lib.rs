//! Fieldfsm: declarative state transitions for persistent records
//!
//! Fieldfsm keeps a pure core apart from an imperative shell. Transition
//! descriptors, guards and the algebra that merges handler groups are plain
//! values with no side effects; binding a transition to a record is the only
//! place where state is read, written and announced.
//!
//! # Core Concepts
//!
//! - **Record**: a persistent type with exactly one state field
//! - **Transition**: sources, a target, guards and a handler, declared once
//!   per record type
//! - **Handler group**: one transition implemented by several members, of
//!   which exactly one runs
//! - **Registry**: the validated transitions of a record type, plus the
//!   listeners notified of its state changes
//!
//! # Example
//!
//! ```rust
//! use fieldfsm::builder::{simple_transition, transition};
//! use fieldfsm::core::{Guard, Handler, Signature};
//! use fieldfsm::{call_args, fsm_record, TransitionError, TransitionRegistry};
//!
//! struct BlogPost {
//!     state: Option<String>,
//!     title: String,
//! }
//!
//! fsm_record!(BlogPost {
//!     state: [state],
//!     plain: [title],
//! });
//!
//! let registry = TransitionRegistry::<BlogPost>::builder()
//!     .transition("publish", simple_transition("new", "published"))
//!     .transition(
//!         "hide",
//!         transition()
//!             .source(["new", "published"])
//!             .target("hidden")
//!             .condition(Guard::new(Signature::positional(1), |inv| {
//!                 inv.arg(0).and_then(|v| v.as_bool()).unwrap_or(false)
//!             }))
//!             .handler(Handler::new(Signature::positional(1), |_| Ok(()))),
//!     )
//!     .build()?;
//!
//! let mut post = BlogPost {
//!     state: Some("new".into()),
//!     title: "Hello".into(),
//! };
//!
//! let mut publish = registry.bind("publish", &mut post)?;
//! assert!(publish.can_proceed(&call_args!())?);
//! publish.set(&call_args!())?;
//! assert!(publish.is_current());
//!
//! let mut hide = registry.bind("hide", &mut post)?;
//! assert!(matches!(
//!     hide.set(&call_args!(false)),
//!     Err(TransitionError::PreconditionFailed { .. })
//! ));
//! hide.set(&call_args!(true))?;
//! assert_eq!(post.state.as_deref(), Some("hidden"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bound;
pub mod builder;
pub mod core;
pub mod events;
pub mod query;
pub mod record;
pub mod registry;

// Re-export commonly used types
pub use crate::bound::{BoundTransition, TransitionError};
pub use crate::builder::{HandlerGroup, SetupError, SetupErrors, Transition, TransitionBuilder};
pub use crate::core::{CallArgs, Guard, Handler, Signature, StateValue, TransitionSpec};
pub use crate::events::{EventKind, ListenerId, StateChange};
pub use crate::query::{QueryBuilder, StatePredicate};
pub use crate::record::Record;
pub use crate::registry::{TransitionDescriptor, TransitionRegistry};
