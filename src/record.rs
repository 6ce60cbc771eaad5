//! The contract a persistent record type offers to the transition engine.
//!
//! The record store owns the state field; transitions only read it, write
//! it, and learn its name from the record's declared schema.

use crate::builder::error::SetupError;
use crate::core::StateValue;

/// Role of a declared field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// The field governed by transitions
    State,
    /// Any other persisted column
    Plain,
}

/// One declared field of a record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn state(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::State,
        }
    }

    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Plain,
        }
    }
}

/// A persistent record with exactly one state field.
///
/// Usually implemented through [`crate::fsm_record!`].
pub trait Record {
    /// Name used in diagnostics.
    fn record_name() -> &'static str;

    /// Every declared field of the record type.
    fn fields() -> Vec<FieldDef>;

    /// Read a state field by name.
    fn read_state(&self, field: &str) -> StateValue;

    /// Overwrite a state field by name.
    fn write_state(&mut self, field: &str, value: StateValue);
}

/// Find the single state field of `R`.
///
/// Zero or several state fields is a configuration error.
pub fn discover_state_field<R: Record>() -> Result<&'static str, SetupError> {
    let fields: Vec<&'static str> = R::fields()
        .into_iter()
        .filter(|field| field.kind == FieldKind::State)
        .map(|field| field.name)
        .collect();

    match fields.len() {
        0 => Err(SetupError::NoStateField {
            record: R::record_name(),
        }),
        1 => Ok(fields[0]),
        _ => Err(SetupError::MultipleStateFields {
            record: R::record_name(),
            fields,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Document {
        status: StateValue,
    }

    impl Record for Document {
        fn record_name() -> &'static str {
            "Document"
        }

        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::plain("id"), FieldDef::state("status")]
        }

        fn read_state(&self, _field: &str) -> StateValue {
            self.status.clone()
        }

        fn write_state(&mut self, _field: &str, value: StateValue) {
            self.status = value;
        }
    }

    struct NotFsm;

    impl Record for NotFsm {
        fn record_name() -> &'static str {
            "NotFsm"
        }

        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::plain("id")]
        }

        fn read_state(&self, _field: &str) -> StateValue {
            None
        }

        fn write_state(&mut self, _field: &str, _value: StateValue) {}
    }

    struct TooMuchFsm;

    impl Record for TooMuchFsm {
        fn record_name() -> &'static str {
            "TooMuchFsm"
        }

        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::state("state1"), FieldDef::state("state2")]
        }

        fn read_state(&self, _field: &str) -> StateValue {
            None
        }

        fn write_state(&mut self, _field: &str, _value: StateValue) {}
    }

    #[test]
    fn any_field_name_can_hold_state() {
        assert_eq!(discover_state_field::<Document>(), Ok("status"));

        let mut doc = Document {
            status: Some("new".into()),
        };
        doc.write_state("status", Some("published".into()));
        assert_eq!(doc.read_state("status").as_deref(), Some("published"));
    }

    #[test]
    fn missing_state_field_is_setup_error() {
        let err = discover_state_field::<NotFsm>().unwrap_err();
        assert_eq!(err, SetupError::NoStateField { record: "NotFsm" });
        assert!(err.to_string().contains("No FSM state field found"));
    }

    #[test]
    fn several_state_fields_are_setup_error() {
        let err = discover_state_field::<TooMuchFsm>().unwrap_err();
        assert!(matches!(
            err,
            SetupError::MultipleStateFields { ref fields, .. } if fields == &["state1", "state2"]
        ));
        assert!(err.to_string().contains("More than one FSM state field"));
    }
}
