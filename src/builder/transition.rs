//! Builder for declaring transitions.

use crate::builder::error::SetupError;
use crate::builder::group::HandlerGroup;
use crate::core::{Guard, Handler, HandlerError, HandlerKind, Sources, TransitionSpec};

/// What runs when a declared transition is taken.
pub enum TransitionBody<R> {
    /// A single handler.
    Function(Handler<R>),
    /// Several member transitions, exactly one of which runs.
    Group(HandlerGroup<R>),
}

impl<R> Clone for TransitionBody<R> {
    fn clone(&self) -> Self {
        match self {
            TransitionBody::Function(handler) => TransitionBody::Function(handler.clone()),
            TransitionBody::Group(group) => TransitionBody::Group(group.clone()),
        }
    }
}

/// A declared transition: its descriptor plus its body.
///
/// Declarations are inert; they only act once bound to a record through
/// [`crate::TransitionRegistry::bind`].
pub struct Transition<R> {
    spec: TransitionSpec<R>,
    body: TransitionBody<R>,
}

impl<R> Transition<R> {
    pub fn spec(&self) -> &TransitionSpec<R> {
        &self.spec
    }

    pub fn body(&self) -> &TransitionBody<R> {
        &self.body
    }

    pub fn kind(&self) -> HandlerKind {
        self.spec.handler_kind()
    }
}

impl<R> Clone for Transition<R> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            body: self.body.clone(),
        }
    }
}

impl<R> std::fmt::Debug for Transition<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition").field("spec", &self.spec).finish()
    }
}

/// Builder for declaring a transition with a fluent API.
///
/// The source defaults to the wildcard and the target is unset. A handler
/// group member may leave the target unset and inherit it from its group.
pub struct TransitionBuilder<R> {
    source: Sources,
    target: Option<String>,
    conditions: Vec<Guard<R>>,
}

impl<R> TransitionBuilder<R> {
    pub fn new() -> Self {
        Self {
            source: Sources::any(),
            target: None,
            conditions: Vec::new(),
        }
    }

    /// Set the states the transition may start from.
    pub fn source(mut self, source: impl Into<Sources>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the state the transition leads to.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Add a guard. Guards are checked in the order they were added.
    pub fn condition(mut self, guard: Guard<R>) -> Self {
        self.conditions.push(guard);
        self
    }

    /// Add a guard that only looks at the record.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
        R: 'static,
    {
        self.condition(Guard::on_record(predicate))
    }

    pub fn conditions(mut self, guards: impl IntoIterator<Item = Guard<R>>) -> Self {
        self.conditions.extend(guards);
        self
    }

    /// Finish the declaration with a single handler.
    pub fn handler(self, handler: Handler<R>) -> Result<Transition<R>, SetupError> {
        Ok(Transition {
            spec: self.spec(HandlerKind::Function)?,
            body: TransitionBody::Function(handler),
        })
    }

    /// Finish the declaration with a handler that only touches the record.
    pub fn on_record<F>(self, body: F) -> Result<Transition<R>, SetupError>
    where
        F: Fn(&mut R) -> Result<(), HandlerError> + Send + Sync + 'static,
        R: 'static,
    {
        self.handler(Handler::on_record(body))
    }

    /// Finish the declaration with a handler group.
    ///
    /// A group whose members failed to declare reports the first failure.
    pub fn group(self, group: HandlerGroup<R>) -> Result<Transition<R>, SetupError> {
        if let Some(err) = group.first_error() {
            return Err(err.clone());
        }
        Ok(Transition {
            spec: self.spec(HandlerKind::Group)?,
            body: TransitionBody::Group(group),
        })
    }

    fn spec(self, kind: HandlerKind) -> Result<TransitionSpec<R>, SetupError> {
        TransitionSpec::new(
            self.source,
            self.target.as_deref(),
            self.conditions,
            [],
            kind,
        )
    }
}

impl<R> Default for TransitionBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
