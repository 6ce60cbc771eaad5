//! Per-record-type transition registries.
//!
//! A registry owns the validated declarations of one record type, the name
//! of that type's state field, and the listeners notified of its state
//! changes. Build it once, typically into a static, and bind records to it
//! as needed:
//!
//! ```
//! use fieldfsm::builder::simple_transition;
//! use fieldfsm::{call_args, fsm_record, TransitionRegistry};
//! use std::sync::OnceLock;
//!
//! struct Post {
//!     status: Option<String>,
//!     title: String,
//! }
//!
//! fsm_record!(Post {
//!     state: [status],
//!     plain: [title],
//! });
//!
//! fn registry() -> &'static TransitionRegistry<Post> {
//!     static REGISTRY: OnceLock<TransitionRegistry<Post>> = OnceLock::new();
//!     REGISTRY.get_or_init(|| {
//!         TransitionRegistry::builder()
//!             .transition("publish", simple_transition("new", "published"))
//!             .build()
//!             .expect("valid transitions")
//!     })
//! }
//!
//! let mut post = Post {
//!     status: Some("new".into()),
//!     title: "Hello".into(),
//! };
//! registry().bind("publish", &mut post)?.set(&call_args!())?;
//! assert_eq!(post.status.as_deref(), Some("published"));
//! # Ok::<(), fieldfsm::TransitionError>(())
//! ```

use crate::bound::node::BoundNode;
use crate::bound::{BoundTransition, TransitionError};
use crate::builder::error::SetupError;
use crate::builder::registry::RegistryBuilder;
use crate::builder::transition::{Transition, TransitionBody};
use crate::core::{is_valid_state, HandlerKind, SourceSet};
use crate::events::{Dispatcher, EventKind, ListenerId, StateChange};
use crate::query::StatePredicate;
use crate::record::Record;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Validated transitions of one record type.
pub struct TransitionRegistry<R: Record> {
    state_field: &'static str,
    transitions: BTreeMap<String, Transition<R>>,
    dispatcher: Dispatcher<R>,
}

impl<R: Record> TransitionRegistry<R> {
    pub fn builder() -> RegistryBuilder<R> {
        RegistryBuilder::new()
    }

    pub(crate) fn new(
        state_field: &'static str,
        transitions: BTreeMap<String, Transition<R>>,
    ) -> Self {
        Self {
            state_field,
            transitions,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Name of the record field holding the state.
    pub fn state_field(&self) -> &'static str {
        self.state_field
    }

    /// Declared transition names, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Transition<R>> {
        self.transitions.get(name)
    }

    fn lookup(&self, name: &str) -> Result<&Transition<R>, TransitionError> {
        self.get(name)
            .ok_or_else(|| TransitionError::UnknownTransition {
                name: name.to_string(),
            })
    }

    /// Attach a declared transition to `record`.
    ///
    /// Handler groups get fresh owner values on every bind.
    pub fn bind<'a>(
        &'a self,
        name: &str,
        record: &'a mut R,
    ) -> Result<BoundTransition<'a, R>, TransitionError> {
        let root = BoundNode::materialize(name, self.lookup(name)?)?;
        trace!(transition = name, record = R::record_name(), "bound transition");
        Ok(BoundTransition::new(
            root,
            record,
            self.state_field,
            &self.dispatcher,
        ))
    }

    /// Predicate "the state field equals this transition's target".
    ///
    /// Needs no record, so it can filter stored records in bulk.
    pub fn query(&self, name: &str) -> Result<StatePredicate, TransitionError> {
        let root = BoundNode::materialize(name, self.lookup(name)?)?;
        Ok(StatePredicate::new(self.state_field, root.target_state()))
    }

    /// Register a listener for state changes of this record type.
    pub fn listen<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&R, &StateChange) + Send + Sync + 'static,
    {
        self.dispatcher.listen(kind, listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.dispatcher.remove(id)
    }

    pub fn dispatcher(&self) -> &Dispatcher<R> {
        &self.dispatcher
    }

    /// Serializable outline of every declared transition.
    pub fn describe(&self) -> Vec<TransitionDescriptor> {
        self.transitions
            .iter()
            .map(|(name, transition)| TransitionDescriptor::of(name, transition))
            .collect()
    }
}

impl<R: Record> std::fmt::Debug for TransitionRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRegistry")
            .field("record", &R::record_name())
            .field("state_field", &self.state_field)
            .field("transitions", &self.transitions.keys().collect::<Vec<_>>())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Outline of a declared transition, as written (before group merging).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDescriptor {
    pub name: String,
    pub kind: HandlerKind,
    pub sources: SourceSet,
    #[serde(default, deserialize_with = "valid_target")]
    pub target: Option<String>,
    pub conditions: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<TransitionDescriptor>,
}

impl TransitionDescriptor {
    fn of<R>(name: &str, transition: &Transition<R>) -> Self {
        let spec = transition.spec();
        let members = match transition.body() {
            TransitionBody::Function(_) => Vec::new(),
            TransitionBody::Group(group) => group
                .members()
                .iter()
                .map(|(member_name, member)| Self::of(member_name, member))
                .collect(),
        };

        Self {
            name: name.to_string(),
            kind: spec.handler_kind(),
            sources: spec.sources().clone(),
            target: spec.target().map(str::to_string),
            conditions: spec.conditions().len(),
            members,
        }
    }
}

fn valid_target<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !is_valid_state(&value) => {
            Err(D::Error::custom(SetupError::InvalidTarget { value }))
        }
        target => Ok(target),
    }
}
