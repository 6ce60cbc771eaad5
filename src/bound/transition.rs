//! A transition bound to one concrete record.

use crate::bound::error::TransitionError;
use crate::bound::node::{Binding, BoundNode};
use crate::core::{display_state, CallArgs, StateValue, TransitionSpec};
use crate::events::Dispatcher;
use crate::record::Record;
use tracing::debug;

/// A declared transition attached to one record, able to inspect and
/// change that record's state.
///
/// Created by [`crate::TransitionRegistry::bind`]. Never shared between
/// records.
pub struct BoundTransition<'a, R: Record> {
    root: BoundNode<R>,
    record: &'a mut R,
    field: &'a str,
    dispatcher: &'a Dispatcher<R>,
}

impl<'a, R: Record> BoundTransition<'a, R> {
    pub(crate) fn new(
        root: BoundNode<R>,
        record: &'a mut R,
        field: &'a str,
        dispatcher: &'a Dispatcher<R>,
    ) -> Self {
        Self {
            root,
            record,
            field,
            dispatcher,
        }
    }

    /// Name of the transition this handle was bound from.
    pub fn name(&self) -> &str {
        self.root.name()
    }

    /// Descriptor of the transition as declared.
    pub fn spec(&self) -> &TransitionSpec<R> {
        self.root.spec()
    }

    pub fn record(&self) -> &R {
        &*self.record
    }

    /// Current value of the record's state field.
    pub fn current_state(&self) -> StateValue {
        self.record.read_state(self.field)
    }

    /// State the record ends up in after [`BoundTransition::set`].
    pub fn target_state(&self) -> &str {
        self.root.target_state()
    }

    /// Whether the current state is one this transition may start from.
    pub fn transition_possible(&self) -> bool {
        self.root
            .transition_possible(self.current_state().as_deref())
    }

    /// Whether every guard holds for `args`.
    ///
    /// A guard that cannot take `args` does not hold. Guards that accept
    /// `args` while the handler does not is a configuration error.
    pub fn conditions_met(&self, args: &CallArgs) -> Result<bool, TransitionError> {
        let current = self.current_state();
        Ok(self
            .root
            .conditions_met(current.as_deref(), &*self.record, args)?)
    }

    /// Whether [`BoundTransition::set`] would succeed with `args`.
    ///
    /// Never changes state and never notifies listeners.
    pub fn can_proceed(&self, args: &CallArgs) -> Result<bool, TransitionError> {
        Ok(self.transition_possible() && self.conditions_met(args)?)
    }

    /// Whether the record already sits in this transition's target state.
    pub fn is_current(&self) -> bool {
        self.current_state().as_deref() == Some(self.target_state())
    }

    /// Move the record to the target state.
    ///
    /// Checks sources, then guards, then runs the handler between the
    /// before and after notifications. The state is written only once the
    /// handler succeeded.
    pub fn set(&mut self, args: &CallArgs) -> Result<(), TransitionError> {
        let current = self.current_state();

        if !self.transition_possible() {
            debug!(
                transition = %self.name(),
                current = %display_state(current.as_deref()),
                "rejected: source state not allowed"
            );
            return Err(TransitionError::InvalidSourceState {
                transition: self.name().to_string(),
                current: display_state(current.as_deref()),
            });
        }
        debug!(transition = %self.name(), "source state checked");

        if !self.conditions_met(args)? {
            debug!(transition = %self.name(), "rejected: preconditions not satisfied");
            return Err(TransitionError::PreconditionFailed {
                transition: self.name().to_string(),
            });
        }
        debug!(transition = %self.name(), "guards checked");

        let binding = Binding {
            field: self.field,
            dispatcher: self.dispatcher,
        };
        self.root.to_next_state(&mut *self.record, &binding, args)
    }
}
