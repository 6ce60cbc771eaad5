//! State values and source specifiers.
//!
//! A record's state field holds either a named state or nothing at all.
//! Transitions name the states they may start from using source
//! specifiers, which add the wildcard on top of plain state names.

use crate::builder::error::SetupError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Source token matching every state, including the unset one.
pub const WILDCARD: &str = "*";

/// Persisted value of a state field. `None` is the null/unset sentinel.
pub type StateValue = Option<String>;

/// Check whether `value` is a legal state name.
///
/// State names are arbitrary non-empty strings.
///
/// # Example
///
/// ```rust
/// use fieldfsm::core::is_valid_state;
///
/// assert!(is_valid_state("published"));
/// assert!(!is_valid_state(""));
/// ```
pub fn is_valid_state(value: &str) -> bool {
    !value.is_empty()
}

/// Check whether `value` is a legal source specifier element.
///
/// Accepts the wildcard, the null sentinel (`None`) and any valid state name.
///
/// # Example
///
/// ```rust
/// use fieldfsm::core::is_valid_source;
///
/// assert!(is_valid_source(Some("*")));
/// assert!(is_valid_source(None));
/// assert!(is_valid_source(Some("new")));
/// assert!(!is_valid_source(Some("")));
/// ```
pub fn is_valid_source(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v == WILDCARD || is_valid_state(v),
    }
}

/// Render a state value for messages and logs.
pub fn display_state(value: Option<&str>) -> String {
    match value {
        Some(state) => format!("'{state}'"),
        None => "<null>".to_string(),
    }
}

/// One element of a transition's source set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawSource")]
pub enum Source {
    /// The wildcard, matches any current state
    Any,
    /// The record has no state assigned yet
    Null,
    /// A concrete state name
    State(String),
}

impl Source {
    /// Validate a raw specifier element.
    pub fn parse(value: Option<&str>) -> Result<Self, SetupError> {
        match value {
            None => Ok(Source::Null),
            Some(WILDCARD) => Ok(Source::Any),
            Some(v) if is_valid_source(Some(v)) => Ok(Source::State(v.to_string())),
            Some(v) => Err(SetupError::InvalidSource {
                value: v.to_string(),
            }),
        }
    }

    /// Check whether a record sitting in `current` satisfies this element.
    pub fn matches(&self, current: Option<&str>) -> bool {
        match (self, current) {
            (Source::Any, _) => true,
            (Source::Null, None) => true,
            (Source::State(name), Some(current)) => name == current,
            _ => false,
        }
    }
}

/// Wire form of [`Source`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawSource {
    Any,
    Null,
    State(String),
}

impl TryFrom<RawSource> for Source {
    type Error = SetupError;

    fn try_from(raw: RawSource) -> Result<Self, Self::Error> {
        match raw {
            RawSource::Any => Ok(Source::Any),
            RawSource::Null => Ok(Source::Null),
            RawSource::State(name) => Source::parse(Some(&name)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Any => f.write_str(WILDCARD),
            Source::Null => f.write_str("<null>"),
            Source::State(name) => write!(f, "'{name}'"),
        }
    }
}

/// Validated, non-empty set of sources a transition may start from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Source>")]
pub struct SourceSet(BTreeSet<Source>);

impl SourceSet {
    /// Build a set from validated elements. Returns `None` when empty.
    pub fn new(sources: impl IntoIterator<Item = Source>) -> Option<Self> {
        let set: BTreeSet<Source> = sources.into_iter().collect();
        if set.is_empty() {
            None
        } else {
            Some(SourceSet(set))
        }
    }

    /// The set containing only the wildcard.
    pub fn any() -> Self {
        SourceSet(BTreeSet::from([Source::Any]))
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.contains(&Source::Any)
    }

    /// Check whether a record in `current` may leave through this set.
    pub fn admits(&self, current: Option<&str>) -> bool {
        self.0.iter().any(|source| source.matches(current))
    }

    pub fn is_superset(&self, other: &SourceSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn intersection(&self, other: &SourceSet) -> Option<SourceSet> {
        SourceSet::new(self.0.intersection(&other.0).cloned())
    }

    pub fn contains(&self, source: &Source) -> bool {
        self.0.contains(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Source>> for SourceSet {
    type Error = SetupError;

    fn try_from(sources: Vec<Source>) -> Result<Self, Self::Error> {
        SourceSet::new(sources).ok_or(SetupError::EmptySources)
    }
}

impl fmt::Display for SourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, source) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{source}")?;
        }
        f.write_str("}")
    }
}
