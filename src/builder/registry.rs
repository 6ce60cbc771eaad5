//! Builder for transition registries.

use crate::bound::node::BoundNode;
use crate::builder::error::{SetupError, SetupErrors};
use crate::builder::transition::Transition;
use crate::record::{discover_state_field, Record};
use crate::registry::TransitionRegistry;
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

type Check = Validation<(), NonEmptyVec<SetupError>>;

/// Collects transition declarations for one record type and validates
/// them together.
pub struct RegistryBuilder<R> {
    declared: Vec<(String, Result<Transition<R>, SetupError>)>,
}

impl<R: Record> RegistryBuilder<R> {
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
        }
    }

    /// Declare a named transition.
    pub fn transition(
        mut self,
        name: impl Into<String>,
        transition: Result<Transition<R>, SetupError>,
    ) -> Self {
        self.declared.push((name.into(), transition));
        self
    }

    /// Validate every declaration and build the registry.
    ///
    /// Does not stop at the first problem: every configuration error found
    /// is returned at once.
    pub fn build(self) -> Result<TransitionRegistry<R>, SetupErrors> {
        let state_field = discover_state_field::<R>();
        let mut checks: Vec<Check> = vec![check(state_field.clone().map(|_| ()))];

        let mut transitions = BTreeMap::new();
        for (name, declared) in self.declared {
            if transitions.contains_key(&name) {
                checks.push(Validation::fail(SetupError::DuplicateTransition { name }));
                continue;
            }
            match declared {
                Ok(transition) => {
                    checks.push(check(
                        BoundNode::materialize(&name, &transition).map(|_| ()),
                    ));
                    transitions.insert(name, transition);
                }
                Err(err) => checks.push(Validation::fail(err)),
            }
        }

        if let Validation::Failure(errors) = Validation::all_vec(checks) {
            return Err(SetupErrors(errors.iter().cloned().collect()));
        }
        let state_field = state_field.map_err(SetupErrors::single)?;

        debug!(
            record = R::record_name(),
            field = state_field,
            transitions = transitions.len(),
            "built transition registry"
        );
        Ok(TransitionRegistry::new(state_field, transitions))
    }
}

impl<R: Record> Default for RegistryBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn check(result: Result<(), SetupError>) -> Check {
    match result {
        Ok(()) => Validation::success(()),
        Err(err) => Validation::fail(err),
    }
}
