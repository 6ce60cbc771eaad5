//! Immutable transition descriptors.

use super::guard::{ExtraArg, Guard};
use super::state::{is_valid_state, Source, SourceSet, WILDCARD};
use crate::builder::error::SetupError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a transition binds: as one handler, or as a group of sub-handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Function,
    Group,
}

/// Raw, unvalidated source specifier as written in a declaration.
///
/// `"*"` is the wildcard and `None` the null sentinel. Converts from a
/// single specifier or from a list of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sources(Vec<Option<String>>);

impl Sources {
    pub fn any() -> Self {
        Sources(vec![Some(WILDCARD.to_string())])
    }

    fn validate(self) -> Result<SourceSet, SetupError> {
        let parsed = self
            .0
            .iter()
            .map(|raw| Source::parse(raw.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        SourceSet::new(parsed).ok_or(SetupError::EmptySources)
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self::any()
    }
}

impl From<&str> for Sources {
    fn from(value: &str) -> Self {
        Sources(vec![Some(value.to_string())])
    }
}

impl From<String> for Sources {
    fn from(value: String) -> Self {
        Sources(vec![Some(value)])
    }
}

impl From<Option<&str>> for Sources {
    fn from(value: Option<&str>) -> Self {
        Sources(vec![value.map(str::to_string)])
    }
}

impl From<Option<String>> for Sources {
    fn from(value: Option<String>) -> Self {
        Sources(vec![value])
    }
}

impl From<Vec<&str>> for Sources {
    fn from(values: Vec<&str>) -> Self {
        Sources(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<String>> for Sources {
    fn from(values: Vec<String>) -> Self {
        Sources(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<&str>>> for Sources {
    fn from(values: Vec<Option<&str>>) -> Self {
        Sources(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Sources {
    fn from(values: [&str; N]) -> Self {
        Sources(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl<const N: usize> From<[Option<&str>; N]> for Sources {
    fn from(values: [Option<&str>; N]) -> Self {
        Sources(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

/// Descriptor of one transition: where it may start, where it leads, the
/// guards it checks and the leading arguments its callables receive.
///
/// Built once at declaration time and never mutated afterwards.
pub struct TransitionSpec<R> {
    sources: SourceSet,
    target: Option<String>,
    conditions: Vec<Guard<R>>,
    extra_call_args: Vec<ExtraArg>,
    handler_kind: HandlerKind,
}

impl<R> TransitionSpec<R> {
    /// Validate a declaration and build its descriptor.
    ///
    /// Fails when any source element or the target is not a legal state
    /// literal, or when the source list is empty.
    pub fn new(
        source: impl Into<Sources>,
        target: Option<&str>,
        conditions: impl IntoIterator<Item = Guard<R>>,
        extra_args: impl IntoIterator<Item = ExtraArg>,
        handler_kind: HandlerKind,
    ) -> Result<Self, SetupError> {
        let target = match target {
            Some(t) if is_valid_state(t) => Some(t.to_string()),
            Some(t) => {
                return Err(SetupError::InvalidTarget {
                    value: t.to_string(),
                })
            }
            None => None,
        };

        Ok(Self {
            sources: source.into().validate()?,
            target,
            conditions: conditions.into_iter().collect(),
            extra_call_args: extra_args.into_iter().collect(),
            handler_kind,
        })
    }

    /// Assemble a descriptor from parts that are already validated.
    pub(crate) fn from_parts(
        sources: SourceSet,
        target: Option<String>,
        conditions: Vec<Guard<R>>,
        extra_call_args: Vec<ExtraArg>,
        handler_kind: HandlerKind,
    ) -> Self {
        Self {
            sources,
            target,
            conditions,
            extra_call_args,
            handler_kind,
        }
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn conditions(&self) -> &[Guard<R>] {
        &self.conditions
    }

    pub fn extra_call_args(&self) -> &[ExtraArg] {
        &self.extra_call_args
    }

    pub fn handler_kind(&self) -> HandlerKind {
        self.handler_kind
    }

    /// Check whether a record in `current` may take this transition.
    pub fn transition_possible(&self, current: Option<&str>) -> bool {
        self.sources.is_wildcard() || self.sources.admits(current)
    }
}

impl<R> Clone for TransitionSpec<R> {
    fn clone(&self) -> Self {
        Self {
            sources: self.sources.clone(),
            target: self.target.clone(),
            conditions: self.conditions.clone(),
            extra_call_args: self.extra_call_args.clone(),
            handler_kind: self.handler_kind,
        }
    }
}

impl<R> fmt::Debug for TransitionSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionSpec")
            .field("sources", &format_args!("{}", self.sources))
            .field("target", &self.target)
            .field("conditions", &self.conditions.len())
            .field("extra_call_args", &self.extra_call_args.len())
            .field("handler_kind", &self.handler_kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post;

    fn spec(
        source: impl Into<Sources>,
        target: Option<&str>,
    ) -> Result<TransitionSpec<Post>, SetupError> {
        TransitionSpec::new(source, target, [], [], HandlerKind::Function)
    }

    #[test]
    fn single_source_becomes_singleton() {
        let spec = spec("new", Some("published")).unwrap();

        assert_eq!(spec.sources().len(), 1);
        assert!(spec.sources().contains(&Source::State("new".into())));
        assert_eq!(spec.target(), Some("published"));
        assert_eq!(spec.handler_kind(), HandlerKind::Function);
    }

    #[test]
    fn list_sources_are_validated_elementwise() {
        let spec = spec(["published", "hidden"], Some("stolen")).unwrap();
        assert_eq!(spec.sources().len(), 2);

        let err = spec_err(vec!["str", ""]);
        assert_eq!(
            err,
            SetupError::InvalidSource {
                value: String::new()
            }
        );
    }

    fn spec_err(source: Vec<&str>) -> SetupError {
        spec(source, Some("blah")).unwrap_err()
    }

    #[test]
    fn invalid_target_is_rejected() {
        let err = spec("*", Some("")).unwrap_err();
        assert_eq!(
            err,
            SetupError::InvalidTarget {
                value: String::new()
            }
        );
    }

    #[test]
    fn empty_source_list_is_rejected() {
        let err = spec(Vec::<&str>::new(), Some("blah")).unwrap_err();
        assert_eq!(err, SetupError::EmptySources);
    }

    #[test]
    fn default_source_is_wildcard() {
        let spec = spec(Sources::default(), None).unwrap();
        assert!(spec.sources().is_wildcard());
        assert_eq!(spec.target(), None);
    }

    #[test]
    fn null_source_is_accepted() {
        let spec = spec([Some("new"), None], Some("published")).unwrap();

        assert!(spec.transition_possible(None));
        assert!(spec.transition_possible(Some("new")));
        assert!(!spec.transition_possible(Some("published")));
    }

    #[test]
    fn wildcard_admits_every_state() {
        let spec = spec("*", Some("moderated")).unwrap();
        for state in [None, Some("new"), Some("moderated"), Some("anything")] {
            assert!(spec.transition_possible(state));
        }
    }

    #[test]
    fn debug_names_descriptor() {
        let spec = spec("new", Some("published")).unwrap();
        let rendered = format!("{spec:?}");
        assert!(rendered.contains("TransitionSpec"));
        assert!(rendered.contains("'new'"));
        assert!(rendered.contains("published"));
    }
}
