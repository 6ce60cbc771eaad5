//! Transitions projected as predicates over stored records.
//!
//! A transition's target can be compared against the state column of
//! records that were never loaded, so bulk queries can ask "which records
//! sit in this transition's target state" without binding each record.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::ops::Not;

/// Host query layer able to express the two predicates a transition needs.
pub trait QueryBuilder {
    type Expr;

    /// `column = value`
    fn eq(&self, column: &str, value: &str) -> Self::Expr;

    /// Logical negation of `expr`.
    fn not(&self, expr: Self::Expr) -> Self::Expr;
}

/// "The state column equals this transition's target", possibly negated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePredicate {
    column: String,
    value: String,
    negated: bool,
}

impl StatePredicate {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            negated: false,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The positive form for `true`, the negated form for `false`.
    pub fn is_(self, expected: bool) -> Self {
        if expected {
            self
        } else {
            !self
        }
    }

    /// Evaluate against a loaded record.
    ///
    /// An unset state never equals the target, so it matches the negated form.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let equal = record.read_state(&self.column).as_deref() == Some(self.value.as_str());
        equal != self.negated
    }

    /// Render through the host's query layer.
    pub fn build<B: QueryBuilder>(&self, builder: &B) -> B::Expr {
        let expr = builder.eq(&self.column, &self.value);
        if self.negated {
            builder.not(expr)
        } else {
            expr
        }
    }
}

impl Not for StatePredicate {
    type Output = StatePredicate;

    fn not(mut self) -> Self::Output {
        self.negated = !self.negated;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateValue;
    use crate::record::FieldDef;

    struct Post {
        state: StateValue,
    }

    impl Record for Post {
        fn record_name() -> &'static str {
            "Post"
        }

        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::state("state")]
        }

        fn read_state(&self, _field: &str) -> StateValue {
            self.state.clone()
        }

        fn write_state(&mut self, _field: &str, value: StateValue) {
            self.state = value;
        }
    }

    struct SqlWhere;

    impl QueryBuilder for SqlWhere {
        type Expr = String;

        fn eq(&self, column: &str, value: &str) -> String {
            format!("{column} = '{value}'")
        }

        fn not(&self, expr: String) -> String {
            format!("NOT ({expr})")
        }
    }

    fn post(state: Option<&str>) -> Post {
        Post {
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn predicate_matches_target_state() {
        let published = StatePredicate::new("state", "published");

        assert!(published.matches(&post(Some("published"))));
        assert!(!published.matches(&post(Some("new"))));
        assert!(!published.matches(&post(None)));
    }

    #[test]
    fn negation_flips_match() {
        let not_published = !StatePredicate::new("state", "published");

        assert!(not_published.is_negated());
        assert!(!not_published.matches(&post(Some("published"))));
        assert!(not_published.matches(&post(Some("new"))));
        assert!(not_published.matches(&post(None)));
        assert!(!(!not_published).is_negated());
    }

    #[test]
    fn is_selects_form() {
        let predicate = StatePredicate::new("state", "hidden");
        assert!(!predicate.clone().is_(true).is_negated());
        assert!(predicate.is_(false).is_negated());
    }

    #[test]
    fn build_renders_through_host() {
        let predicate = StatePredicate::new("status", "published");

        assert_eq!(predicate.build(&SqlWhere), "status = 'published'");
        assert_eq!((!predicate).build(&SqlWhere), "NOT (status = 'published')");
    }
}
