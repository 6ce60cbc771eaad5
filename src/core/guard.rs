//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that decide whether a transition may
//! run for a given record and call. All guards of a transition must hold.

use super::args::{ArityMismatch, CallArgs, Signature};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Extra leading argument passed to every guard and handler of a transition.
///
/// Members of a handler group receive the group's owner instance here.
pub type ExtraArg = Arc<dyn Any + Send + Sync>;

type Predicate<R> = Arc<dyn Fn(&Invocation<'_, R>) -> bool + Send + Sync>;

/// Read-only view of one guard evaluation.
pub struct Invocation<'a, R> {
    extra: &'a [ExtraArg],
    record: &'a R,
    args: &'a CallArgs,
}

impl<'a, R> Invocation<'a, R> {
    pub fn new(extra: &'a [ExtraArg], record: &'a R, args: &'a CallArgs) -> Self {
        Self {
            extra,
            record,
            args,
        }
    }

    pub fn record(&self) -> &'a R {
        self.record
    }

    pub fn args(&self) -> &'a CallArgs {
        self.args
    }

    /// Positional call argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// Owner instances of every enclosing handler group, innermost first.
    pub fn extra(&self) -> &'a [ExtraArg] {
        self.extra
    }

    /// The nearest owning handler-group instance, if it has type `T`.
    ///
    /// Only the innermost owner is consulted. Owners of outer groups are
    /// reachable through [`extra`](Self::extra).
    pub fn owner<T: Any>(&self) -> Option<&'a T> {
        self.extra.first().and_then(|arg| arg.downcast_ref::<T>())
    }
}

/// Pure predicate that determines if a transition can execute.
///
/// A guard declares the call arguments it accepts. A guard evaluated
/// against arguments its signature rejects does not hold.
///
/// # Example
///
/// ```rust
/// use fieldfsm::core::{CallArgs, Guard, Invocation, Signature};
///
/// struct Post { words: usize }
///
/// let long_enough = Guard::on_record(|post: &Post| post.words >= 100);
/// let value_is_one = Guard::new(Signature::positional(1), |inv: &Invocation<'_, Post>| {
///     inv.arg(0).and_then(|v| v.as_i64()) == Some(1)
/// });
///
/// let post = Post { words: 250 };
/// let no_args = CallArgs::new();
/// let one = CallArgs::new().arg(1);
///
/// assert!(long_enough.check(&Invocation::new(&[], &post, &no_args)));
/// assert!(value_is_one.check(&Invocation::new(&[], &post, &one)));
/// assert!(value_is_one.accepts(&no_args).is_err());
/// ```
pub struct Guard<R> {
    signature: Signature,
    predicate: Predicate<R>,
}

impl<R> Guard<R> {
    /// Create a guard from a predicate and the call arguments it accepts.
    pub fn new<F>(signature: Signature, predicate: F) -> Self
    where
        F: Fn(&Invocation<'_, R>) -> bool + Send + Sync + 'static,
    {
        Guard {
            signature,
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that only looks at the record and takes no call arguments.
    pub fn on_record<F>(predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
        R: 'static,
    {
        Self::new(Signature::none(), move |inv: &Invocation<'_, R>| {
            predicate(inv.record())
        })
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Check that this guard can be called with `args`.
    pub fn accepts(&self, args: &CallArgs) -> Result<(), ArityMismatch> {
        self.signature.accepts(args)
    }

    /// Evaluate the predicate. The caller is responsible for checking
    /// [`Guard::accepts`] first.
    pub fn check(&self, invocation: &Invocation<'_, R>) -> bool {
        (self.predicate)(invocation)
    }
}

impl<R> Clone for Guard<R> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<R> fmt::Debug for Guard<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
