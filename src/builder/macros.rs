//! Macros for ergonomic record and call declaration.

/// Build [`CallArgs`](crate::core::CallArgs) from positional values, then
/// optional `name = value` pairs after a semicolon.
///
/// # Example
///
/// ```
/// use fieldfsm::call_args;
///
/// let none = call_args!();
/// let positional = call_args!(1, "two");
/// let mixed = call_args!(1; by = "editor");
///
/// assert!(none.is_empty());
/// assert_eq!(positional.len(), 2);
/// assert_eq!(mixed.get_named("by"), Some(&serde_json::json!("editor")));
/// ```
#[macro_export]
macro_rules! call_args {
    ($($value:expr),* ; $($key:ident = $named:expr),+ $(,)?) => {
        $crate::core::CallArgs::new()
            $(.arg($value))*
            $(.named(stringify!($key), $named))+
    };
    () => {
        $crate::core::CallArgs::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::core::CallArgs::new()$(.arg($value))+
    };
}

/// Implement [`Record`](crate::record::Record) for a struct whose state
/// fields are [`StateValue`](crate::core::StateValue)s.
///
/// Plain fields are listed only so they show up in the record's field
/// list. Declaring several state fields compiles, but a registry for such a
/// record fails to build.
///
/// # Example
///
/// ```
/// use fieldfsm::fsm_record;
/// use fieldfsm::core::StateValue;
/// use fieldfsm::record::Record;
///
/// struct Article {
///     status: StateValue,
///     title: String,
/// }
///
/// fsm_record!(Article {
///     state: [status],
///     plain: [title],
/// });
///
/// let mut article = Article { status: None, title: "Draft".into() };
/// article.write_state("status", Some("new".into()));
/// assert_eq!(article.read_state("status").as_deref(), Some("new"));
/// ```
#[macro_export]
macro_rules! fsm_record {
    (
        $record:ident {
            state: [$($state:ident),+ $(,)?]
            $(, plain: [$($plain:ident),* $(,)?])?
            $(,)?
        }
    ) => {
        impl $crate::record::Record for $record {
            fn record_name() -> &'static str {
                stringify!($record)
            }

            fn fields() -> ::std::vec::Vec<$crate::record::FieldDef> {
                vec![
                    $($crate::record::FieldDef::state(stringify!($state)),)+
                    $($($crate::record::FieldDef::plain(stringify!($plain)),)*)?
                ]
            }

            fn read_state(&self, field: &str) -> $crate::core::StateValue {
                match field {
                    $(f if f == stringify!($state) => self.$state.clone(),)+
                    _ => None,
                }
            }

            fn write_state(&mut self, field: &str, value: $crate::core::StateValue) {
                match field {
                    $(f if f == stringify!($state) => self.$state = value,)+
                    _ => {}
                }
            }
        }
    };
}
