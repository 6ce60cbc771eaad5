//! Materialized transition trees.
//!
//! A declared transition is turned into a tree of nodes: one leaf per
//! handler, one composite per handler group. Every leaf carries the
//! descriptor obtained by merging it with all enclosing groups.

use crate::bound::error::TransitionError;
use crate::builder::error::SetupError;
use crate::builder::transition::{Transition, TransitionBody};
use crate::core::{compose, CallArgs, Handler, Invocation, TransitionSpec};
use crate::events::{Dispatcher, StateChange};
use crate::record::Record;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Where a bound tree reads and writes state, and whom it notifies.
pub(crate) struct Binding<'a, R> {
    pub field: &'a str,
    pub dispatcher: &'a Dispatcher<R>,
}

pub(crate) enum BoundNode<R> {
    Function(BoundFunction<R>),
    Composite(BoundComposite<R>),
}

pub(crate) struct BoundFunction<R> {
    name: String,
    spec: TransitionSpec<R>,
    target: String,
    handler: Handler<R>,
}

pub(crate) struct BoundComposite<R> {
    name: String,
    spec: TransitionSpec<R>,
    target: String,
    children: Vec<BoundNode<R>>,
}

impl<R> BoundNode<R> {
    /// Build the tree for a declared transition.
    ///
    /// Every merge incompatibility, empty group and target conflict is
    /// reported here, before any attempt to change state.
    pub(crate) fn materialize(name: &str, transition: &Transition<R>) -> Result<Self, SetupError> {
        Self::from_spec(name, transition.spec().clone(), transition.body())
    }

    fn from_spec(
        name: &str,
        spec: TransitionSpec<R>,
        body: &TransitionBody<R>,
    ) -> Result<Self, SetupError> {
        match body {
            TransitionBody::Function(handler) => {
                let target = spec
                    .target()
                    .ok_or_else(|| SetupError::MissingTarget {
                        transition: name.to_string(),
                    })?
                    .to_string();
                Ok(BoundNode::Function(BoundFunction {
                    name: name.to_string(),
                    spec,
                    target,
                    handler: handler.clone(),
                }))
            }
            TransitionBody::Group(group) => {
                if group.is_empty() {
                    return Err(SetupError::EmptyGroup {
                        group: name.to_string(),
                    });
                }

                let owner = group.instantiate_owner();
                let children = group
                    .members()
                    .iter()
                    .map(|(member_name, member)| {
                        let merged = compose::merge(&spec, member.spec(), Arc::clone(&owner))?;
                        Self::from_spec(&format!("{name}.{member_name}"), merged, member.body())
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let targets: BTreeSet<&str> =
                    children.iter().map(|child| child.target_state()).collect();
                let target = match targets.iter().next() {
                    Some(only) if targets.len() == 1 => only.to_string(),
                    _ => {
                        return Err(SetupError::ConflictingTargets {
                            group: name.to_string(),
                            targets: targets.iter().map(|t| t.to_string()).collect(),
                        })
                    }
                };

                Ok(BoundNode::Composite(BoundComposite {
                    name: name.to_string(),
                    spec,
                    target,
                    children,
                }))
            }
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            BoundNode::Function(f) => &f.name,
            BoundNode::Composite(c) => &c.name,
        }
    }

    pub(crate) fn spec(&self) -> &TransitionSpec<R> {
        match self {
            BoundNode::Function(f) => &f.spec,
            BoundNode::Composite(c) => &c.spec,
        }
    }

    pub(crate) fn target_state(&self) -> &str {
        match self {
            BoundNode::Function(f) => &f.target,
            BoundNode::Composite(c) => &c.target,
        }
    }

    /// A composite is possible when any of its members is.
    pub(crate) fn transition_possible(&self, current: Option<&str>) -> bool {
        match self {
            BoundNode::Function(f) => f.spec.transition_possible(current),
            BoundNode::Composite(c) => c
                .children
                .iter()
                .any(|child| child.transition_possible(current)),
        }
    }

    /// A composite's conditions are met when some member is both possible
    /// and satisfied.
    pub(crate) fn conditions_met(
        &self,
        current: Option<&str>,
        record: &R,
        args: &CallArgs,
    ) -> Result<bool, SetupError> {
        match self {
            BoundNode::Function(f) => f.conditions_met(record, args),
            BoundNode::Composite(c) => {
                for child in &c.children {
                    if child.transition_possible(current)
                        && child.conditions_met(current, record, args)?
                    {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    pub(crate) fn to_next_state(
        &self,
        record: &mut R,
        binding: &Binding<'_, R>,
        args: &CallArgs,
    ) -> Result<(), TransitionError>
    where
        R: Record,
    {
        match self {
            BoundNode::Function(f) => f.to_next_state(record, binding, args),
            BoundNode::Composite(c) => c.to_next_state(record, binding, args),
        }
    }
}

impl<R> BoundFunction<R> {
    fn conditions_met(&self, record: &R, args: &CallArgs) -> Result<bool, SetupError> {
        let conditions = self.spec.conditions();
        if conditions.is_empty() {
            return Ok(true);
        }

        let invocation = Invocation::new(self.spec.extra_call_args(), record, args);
        for (index, guard) in conditions.iter().enumerate() {
            if let Err(mismatch) = guard.accepts(args) {
                trace!(
                    transition = %self.name,
                    guard = index,
                    %mismatch,
                    "guard does not accept call arguments"
                );
                return Ok(false);
            }
            if !guard.check(&invocation) {
                return Ok(false);
            }
        }

        // Guards passed, so the handler must take the same arguments.
        if let Err(mismatch) = self.handler.accepts(args) {
            warn!(
                transition = %self.name,
                %mismatch,
                "failure to validate handler call args"
            );
            return Err(SetupError::ArityMismatch {
                handler: self.name.clone(),
                detail: mismatch.to_string(),
            });
        }
        Ok(true)
    }

    fn to_next_state(
        &self,
        record: &mut R,
        binding: &Binding<'_, R>,
        args: &CallArgs,
    ) -> Result<(), TransitionError>
    where
        R: Record,
    {
        let change = StateChange::new(
            record.read_state(binding.field),
            Some(self.target.clone()),
        );

        binding.dispatcher.before_state_change(record, &change);

        let handler_failed = |source| TransitionError::Handler {
            transition: self.name.clone(),
            source,
        };
        self.handler
            .accepts(args)
            .map_err(|mismatch| handler_failed(mismatch.into()))?;
        self.handler
            .invoke(self.spec.extra_call_args(), record, args)
            .map_err(handler_failed)?;

        record.write_state(binding.field, change.target.clone());
        binding.dispatcher.after_state_change(record, &change);

        debug!(
            transition = %self.name,
            source = ?change.source,
            target = %self.target,
            "state changed"
        );
        Ok(())
    }
}

impl<R> BoundComposite<R> {
    fn to_next_state(
        &self,
        record: &mut R,
        binding: &Binding<'_, R>,
        args: &CallArgs,
    ) -> Result<(), TransitionError>
    where
        R: Record,
    {
        let current = record.read_state(binding.field);

        let mut qualifying = Vec::new();
        for child in &self.children {
            if child.transition_possible(current.as_deref())
                && child.conditions_met(current.as_deref(), record, args)?
            {
                qualifying.push(child);
            }
        }

        match qualifying.as_slice() {
            [] => Err(TransitionError::PreconditionFailed {
                transition: self.name.clone(),
            }),
            [only] => {
                trace!(group = %self.name, member = %only.name(), "selected group member");
                only.to_next_state(record, binding, args)
            }
            many => Err(SetupError::AmbiguousHandlers {
                handlers: many.iter().map(|child| child.name().to_string()).collect(),
            }
            .into()),
        }
    }
}
