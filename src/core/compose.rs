//! Merging a handler group's descriptor with each of its members.
//!
//! A member of a group may only narrow what the group allows: its sources
//! must fit inside the group's, its target must agree with the group's,
//! and its guards run after the group's guards.

use super::guard::{ExtraArg, Guard};
use super::spec::TransitionSpec;
use super::state::SourceSet;
use crate::builder::error::SetupError;

/// Intersect a group's sources with a member's.
///
/// A wildcard on either side yields the other side. Otherwise the member's
/// sources must be a subset of the group's; anything else is an
/// incompatibility rather than an empty set.
pub fn intersect_sources(parent: &SourceSet, child: &SourceSet) -> Result<SourceSet, SetupError> {
    if parent.is_wildcard() {
        return Ok(child.clone());
    }
    if child.is_wildcard() {
        return Ok(parent.clone());
    }
    if parent.is_superset(child) {
        if let Some(shared) = parent.intersection(child) {
            return Ok(shared);
        }
    }
    Err(SetupError::IncompatibleSources {
        parent: parent.to_string(),
        child: child.to_string(),
    })
}

/// Agree on the target state of a merged member.
///
/// An unset side defers to the other side. Two different targets, or no
/// target on either side, cannot be merged.
pub fn unify_target(parent: Option<&str>, child: Option<&str>) -> Result<String, SetupError> {
    match (parent, child) {
        (Some(p), None) => Ok(p.to_string()),
        (None, Some(c)) => Ok(c.to_string()),
        (Some(p), Some(c)) if p == c => Ok(p.to_string()),
        _ => Err(SetupError::IncompatibleTargets {
            parent: parent.map(str::to_string),
            child: child.map(str::to_string),
        }),
    }
}

/// Group guards first, then member guards.
pub fn concat_conditions<R>(parent: &[Guard<R>], child: &[Guard<R>]) -> Vec<Guard<R>> {
    parent.iter().chain(child).cloned().collect()
}

/// The owner instance, then the group's extra arguments, then the member's.
pub fn concat_args(owner: ExtraArg, parent: &[ExtraArg], child: &[ExtraArg]) -> Vec<ExtraArg> {
    std::iter::once(owner)
        .chain(parent.iter().cloned())
        .chain(child.iter().cloned())
        .collect()
}

/// Derive the effective descriptor of `child` when nested in `parent` and
/// owned by `owner`.
pub fn merge<R>(
    parent: &TransitionSpec<R>,
    child: &TransitionSpec<R>,
    owner: ExtraArg,
) -> Result<TransitionSpec<R>, SetupError> {
    let sources = intersect_sources(parent.sources(), child.sources())?;
    let target = unify_target(parent.target(), child.target())?;

    Ok(TransitionSpec::from_parts(
        sources,
        Some(target),
        concat_conditions(parent.conditions(), child.conditions()),
        concat_args(owner, parent.extra_call_args(), child.extra_call_args()),
        child.handler_kind(),
    ))
}
