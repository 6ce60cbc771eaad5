//! Declaration mistakes and how they surface.

use fieldfsm::builder::{simple_transition, transition, HandlerGroup, Transition};
use fieldfsm::core::{Guard, Handler, HandlerCall, Invocation, Signature, StateValue};
use fieldfsm::record::{FieldDef, Record};
use fieldfsm::{call_args, fsm_record, SetupError, TransitionError, TransitionRegistry};

struct Misconfigured {
    state: StateValue,
}

fsm_record!(Misconfigured { state: [state] });

fn one_arg_condition() -> Guard<Misconfigured> {
    Guard::new(
        Signature::positional(1),
        |_: &Invocation<'_, Misconfigured>| true,
    )
}

fn one_arg_handler() -> Handler<Misconfigured> {
    Handler::new(
        Signature::positional(1),
        |_: &mut HandlerCall<'_, Misconfigured>| Ok(()),
    )
}

fn single(
    name: &str,
    declared: Result<Transition<Misconfigured>, SetupError>,
) -> Result<TransitionRegistry<Misconfigured>, Vec<SetupError>> {
    TransitionRegistry::builder()
        .transition(name, declared)
        .build()
        .map_err(|errors| errors.errors().to_vec())
}

fn record() -> Misconfigured {
    Misconfigured {
        state: Some("new".into()),
    }
}

#[test]
fn guard_and_handler_arity_mismatch() {
    let registry = single(
        "change_state",
        transition()
            .target("blah")
            .condition(one_arg_condition())
            .handler(Handler::noop()),
    )
    .unwrap();
    let mut record = record();

    let err = registry
        .bind("change_state", &mut record)
        .unwrap()
        .set(&call_args!(42))
        .unwrap_err();

    assert!(matches!(
        err.as_setup(),
        Some(SetupError::ArityMismatch { handler, .. }) if handler == "change_state"
    ));
    assert!(!err.is_recoverable());
    assert!(err
        .to_string()
        .contains("Mismatch between args accepted by preconditions and handler"));
    assert_eq!(record.state.as_deref(), Some("new"));
}

#[test]
fn guard_that_rejects_arguments_is_not_an_error() {
    let registry = single(
        "change_state",
        transition()
            .target("blah")
            .condition(one_arg_condition())
            .handler(Handler::noop()),
    )
    .unwrap();
    let mut record = record();
    let bound = registry.bind("change_state", &mut record).unwrap();

    assert!(!bound.conditions_met(&call_args!()).unwrap());
    assert!(!bound.conditions_met(&call_args!(1, 2)).unwrap());
}

#[test]
fn handler_rejecting_arguments_without_guards_fails_as_handler() {
    let registry = single("change_state", simple_transition("*", "blah")).unwrap();
    let mut record = record();

    let mut bound = registry.bind("change_state", &mut record).unwrap();
    assert!(bound.can_proceed(&call_args!(42)).unwrap());

    let err = bound.set(&call_args!(42)).unwrap_err();
    assert!(matches!(err, TransitionError::Handler { .. }));
    assert_eq!(record.state.as_deref(), Some("new"));
}

#[test]
fn multiple_handlers_are_ambiguous() {
    let registry = single(
        "multi_handler_transition",
        transition().target("blah").group(
            HandlerGroup::new()
                .member("transition1", transition().handler(Handler::noop()))
                .member("transition2", transition().handler(Handler::noop())),
        ),
    )
    .unwrap();
    let mut record = record();

    let mut bound = registry
        .bind("multi_handler_transition", &mut record)
        .unwrap();
    assert!(bound.can_proceed(&call_args!()).unwrap());

    let err = bound.set(&call_args!()).unwrap_err();
    assert!(matches!(
        err.as_setup(),
        Some(SetupError::AmbiguousHandlers { handlers }) if handlers.len() == 2
    ));
    assert!(err.to_string().contains("Can transition with multiple handlers"));
    assert_eq!(record.state.as_deref(), Some("new"));
}

#[test]
fn incompatible_targets() {
    let errors = single(
        "incompatible_targets",
        transition().target("blah").group(
            HandlerGroup::new().member(
                "transition1",
                transition().target("not-blah").handler(Handler::noop()),
            ),
        ),
    )
    .unwrap_err();

    assert_eq!(
        errors,
        vec![SetupError::IncompatibleTargets {
            parent: Some("blah".into()),
            child: Some("not-blah".into()),
        }]
    );
    assert!(errors[0].to_string().contains("are not compatible"));
}

#[test]
fn incompatible_sources() {
    let errors = single(
        "incompatible_sources",
        transition().source(["src1", "src2"]).target("blah").group(
            HandlerGroup::new().member(
                "transition1",
                transition()
                    .source(["src3", "src4"])
                    .handler(Handler::noop()),
            ),
        ),
    )
    .unwrap_err();

    assert!(matches!(
        errors.as_slice(),
        [SetupError::IncompatibleSources { .. }]
    ));
    assert!(errors[0].to_string().contains("are not compatible"));
}

#[test]
fn members_with_different_targets_conflict() {
    let errors = single(
        "split",
        transition().group(
            HandlerGroup::new()
                .member(
                    "left",
                    transition().source("new").target("left").handler(Handler::noop()),
                )
                .member(
                    "right",
                    transition().source("old").target("right").handler(Handler::noop()),
                ),
        ),
    )
    .unwrap_err();

    assert_eq!(
        errors,
        vec![SetupError::ConflictingTargets {
            group: "split".into(),
            targets: vec!["left".into(), "right".into()],
        }]
    );
}

#[test]
fn no_conflict_due_to_precondition_arg_count() {
    let registry = single(
        "no_conflict",
        transition().target("blah").group(
            HandlerGroup::new()
                .member(
                    "change_state",
                    transition()
                        .condition(one_arg_condition())
                        .handler(one_arg_handler()),
                )
                .member("no_arg_condition", transition().handler(Handler::noop())),
        ),
    )
    .unwrap();
    let mut record = record();

    let mut bound = registry.bind("no_conflict", &mut record).unwrap();
    assert!(bound.can_proceed(&call_args!()).unwrap());
    bound.set(&call_args!()).unwrap();
    assert_eq!(record.state.as_deref(), Some("blah"));
}

#[test]
fn invalid_state_literals() {
    assert!(matches!(
        simple_transition::<Misconfigured>("", "blah"),
        Err(SetupError::InvalidSource { .. })
    ));
    assert!(matches!(
        simple_transition::<Misconfigured>("*", ""),
        Err(SetupError::InvalidTarget { .. })
    ));
    assert!(matches!(
        simple_transition::<Misconfigured>(vec!["str", ""], "blah"),
        Err(SetupError::InvalidSource { .. })
    ));
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

#[test]
fn record_without_state_field() {
    let errors = TransitionRegistry::<NotFsm>::builder()
        .transition("change_state", simple_transition("*", "blah"))
        .build()
        .unwrap_err();

    assert_eq!(errors.errors(), &[SetupError::NoStateField { record: "NotFsm" }]);
    assert!(errors.to_string().contains("No FSM state field found"));
}
