//! Call arguments and the signatures guards and handlers declare.
//!
//! A transition is invoked with caller-supplied arguments. Every guard and
//! handler declares which arguments it accepts; a guard that cannot accept
//! the arguments of a call simply does not hold for that call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Arguments passed by the caller of a transition.
///
/// The record and any extra leading arguments are supplied by the
/// transition itself and are not part of `CallArgs`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a keyword argument.
    pub fn named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_named(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_args(&self) -> &BTreeMap<String, Value> {
        &self.named
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl<V: Into<Value>> FromIterator<V> for CallArgs {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
            named: BTreeMap::new(),
        }
    }
}

/// Reason a signature rejects a set of call arguments.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArityMismatch {
    #[error("expected at least {min} positional argument(s), got {given}")]
    TooFew { min: usize, given: usize },

    #[error("expected at most {max} positional argument(s), got {given}")]
    TooMany { max: usize, given: usize },

    #[error("unexpected keyword argument '{name}'")]
    UnexpectedKeyword { name: String },
}

/// Parameter list declared by a guard or handler.
///
/// Only caller-supplied arguments are described; the record and extra
/// leading arguments are always passed.
///
/// # Example
///
/// ```rust
/// use fieldfsm::core::{CallArgs, Signature};
///
/// let sig = Signature::positional(1).keyword("reason");
///
/// assert!(sig.accepts(&CallArgs::new().arg(1)).is_ok());
/// assert!(sig.accepts(&CallArgs::new().arg(1).named("reason", "spam")).is_ok());
/// assert!(sig.accepts(&CallArgs::new()).is_err());
/// assert!(sig.accepts(&CallArgs::new().arg(1).named("tomato", "potato")).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    required: usize,
    optional: usize,
    variadic: bool,
    keywords: Vec<String>,
    any_keyword: bool,
}

impl Signature {
    /// Accept exactly `count` positional arguments.
    pub fn positional(count: usize) -> Self {
        Self {
            required: count,
            ..Self::default()
        }
    }

    /// Accept no caller arguments at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Accept `count` further positional arguments after the required ones.
    pub fn optional(mut self, count: usize) -> Self {
        self.optional = count;
        self
    }

    /// Accept any number of trailing positional arguments.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Accept a keyword argument with this name.
    pub fn keyword(mut self, name: impl Into<String>) -> Self {
        self.keywords.push(name.into());
        self
    }

    /// Accept keyword arguments of any name.
    pub fn any_keyword(mut self) -> Self {
        self.any_keyword = true;
        self
    }

    /// Check whether a call with `args` could be bound to this signature.
    pub fn accepts(&self, args: &CallArgs) -> Result<(), ArityMismatch> {
        let given = args.len();
        if given < self.required {
            return Err(ArityMismatch::TooFew {
                min: self.required,
                given,
            });
        }

        let max = self.required + self.optional;
        if !self.variadic && given > max {
            return Err(ArityMismatch::TooMany { max, given });
        }

        if !self.any_keyword {
            if let Some(name) = args
                .named_args()
                .keys()
                .find(|name| !self.keywords.contains(name))
            {
                return Err(ArityMismatch::UnexpectedKeyword { name: name.clone() });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_positional_count() {
        let sig = Signature::positional(2);

        assert!(sig.accepts(&CallArgs::from_iter([1, 2])).is_ok());
        assert_eq!(
            sig.accepts(&CallArgs::from_iter([1])),
            Err(ArityMismatch::TooFew { min: 2, given: 1 })
        );
        assert_eq!(
            sig.accepts(&CallArgs::from_iter([1, 2, 3])),
            Err(ArityMismatch::TooMany { max: 2, given: 3 })
        );
    }

    #[test]
    fn optional_and_variadic_arguments() {
        let sig = Signature::positional(1).optional(1);
        assert!(sig.accepts(&CallArgs::from_iter([1])).is_ok());
        assert!(sig.accepts(&CallArgs::from_iter([1, 2])).is_ok());
        assert!(sig.accepts(&CallArgs::from_iter([1, 2, 3])).is_err());

        let sig = Signature::none().variadic();
        assert!(sig.accepts(&CallArgs::new()).is_ok());
        assert!(sig.accepts(&CallArgs::from_iter([1, 2, 3, 4])).is_ok());
    }

    #[test]
    fn keywords_must_be_declared() {
        let args = CallArgs::new().named("tomato", "potato");

        assert_eq!(
            Signature::none().accepts(&args),
            Err(ArityMismatch::UnexpectedKeyword {
                name: "tomato".to_string()
            })
        );
        assert!(Signature::none().keyword("tomato").accepts(&args).is_ok());
        assert!(Signature::none().any_keyword().accepts(&args).is_ok());
    }

    #[test]
    fn call_args_accessors() {
        let args = CallArgs::new().arg("str").arg(-1).named("flag", true);

        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some(&json!("str")));
        assert_eq!(args.get(1), Some(&json!(-1)));
        assert_eq!(args.get(2), None);
        assert_eq!(args.get_named("flag"), Some(&json!(true)));
        assert!(!args.is_empty());
        assert!(CallArgs::new().is_empty());
    }
}
