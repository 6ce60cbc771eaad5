//! Transition handlers: the side effects run when a transition is applied.

use super::args::{ArityMismatch, CallArgs, Signature};
use super::guard::ExtraArg;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Error raised by a handler body. It reaches the caller of `set` unchanged.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Body<R> = Arc<dyn Fn(&mut HandlerCall<'_, R>) -> Result<(), HandlerError> + Send + Sync>;

/// Mutable view handed to a handler body.
pub struct HandlerCall<'a, R> {
    extra: &'a [ExtraArg],
    record: &'a mut R,
    args: &'a CallArgs,
}

impl<'a, R> HandlerCall<'a, R> {
    pub fn new(extra: &'a [ExtraArg], record: &'a mut R, args: &'a CallArgs) -> Self {
        Self {
            extra,
            record,
            args,
        }
    }

    pub fn record(&self) -> &R {
        &*self.record
    }

    pub fn record_mut(&mut self) -> &mut R {
        &mut *self.record
    }

    pub fn args(&self) -> &'a CallArgs {
        self.args
    }

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

/// Body of a transition together with the call arguments it accepts.
pub struct Handler<R> {
    signature: Signature,
    body: Body<R>,
}

impl<R> Handler<R> {
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(&mut HandlerCall<'_, R>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(body),
        }
    }

    /// Handler taking no call arguments that only touches the record.
    pub fn on_record<F>(body: F) -> Self
    where
        F: Fn(&mut R) -> Result<(), HandlerError> + Send + Sync + 'static,
        R: 'static,
    {
        Self::new(Signature::none(), move |call: &mut HandlerCall<'_, R>| {
            body(call.record_mut())
        })
    }

    /// Handler with no side effects and no call arguments.
    pub fn noop() -> Self
    where
        R: 'static,
    {
        Self::new(Signature::none(), |_: &mut HandlerCall<'_, R>| Ok(()))
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn accepts(&self, args: &CallArgs) -> Result<(), ArityMismatch> {
        self.signature.accepts(args)
    }

    /// Run the body.
    pub fn invoke(
        &self,
        extra: &[ExtraArg],
        record: &mut R,
        args: &CallArgs,
    ) -> Result<(), HandlerError> {
        let mut call = HandlerCall::new(extra, record, args);
        (self.body)(&mut call)
    }
}

impl<R> Clone for Handler<R> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<R> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
