//! Builder API for declaring transitions.
//!
//! This module provides fluent builders and macros for declaring the
//! transitions of a record type with minimal boilerplate. Declarations are
//! validated as they are built and once more, all together, when the
//! registry is built.

pub mod error;
pub mod group;
pub mod macros;
pub mod registry;
pub mod transition;

pub use error::{SetupError, SetupErrors};
pub use group::HandlerGroup;
pub use registry::RegistryBuilder;
pub use transition::{Transition, TransitionBody, TransitionBuilder};

use crate::core::{Guard, Handler, Sources};

/// Start declaring a transition.
///
/// # Example
///
/// ```
/// use fieldfsm::builder::transition;
/// use fieldfsm::core::Handler;
///
/// struct Post;
///
/// let hide = transition::<Post>()
///     .source(["new", "published"])
///     .target("hidden")
///     .handler(Handler::noop())
///     .unwrap();
///
/// assert_eq!(hide.spec().target(), Some("hidden"));
/// ```
pub fn transition<R>() -> TransitionBuilder<R> {
    TransitionBuilder::new()
}

/// Unconditional transition with a handler that does nothing.
///
/// # Example
///
/// ```
/// use fieldfsm::builder::simple_transition;
///
/// struct Post;
///
/// let publish = simple_transition::<Post>("new", "published").unwrap();
/// assert!(publish.spec().transition_possible(Some("new")));
/// ```
pub fn simple_transition<R: 'static>(
    source: impl Into<Sources>,
    target: &str,
) -> Result<Transition<R>, SetupError> {
    transition()
        .source(source)
        .target(target)
        .handler(Handler::noop())
}

/// Transition guarded by one predicate on the record, with a handler that
/// does nothing.
///
/// # Example
///
/// ```
/// use fieldfsm::builder::guarded_transition;
///
/// struct Post {
///     approved: bool,
/// }
///
/// let publish = guarded_transition("new", "published", |post: &Post| post.approved).unwrap();
/// assert_eq!(publish.spec().conditions().len(), 1);
/// ```
pub fn guarded_transition<R, F>(
    source: impl Into<Sources>,
    target: &str,
    guard: F,
) -> Result<Transition<R>, SetupError>
where
    R: 'static,
    F: Fn(&R) -> bool + Send + Sync + 'static,
{
    transition()
        .source(source)
        .target(target)
        .condition(Guard::on_record(guard))
        .handler(Handler::noop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallArgs, HandlerKind, Invocation};

    struct Post {
        approved: bool,
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition::<Post>(["new", "hidden"], "published").unwrap();

        assert_eq!(transition.kind(), HandlerKind::Function);
        assert!(transition.spec().transition_possible(Some("hidden")));
        assert!(!transition.spec().transition_possible(Some("published")));
        assert!(transition.spec().conditions().is_empty());
    }

    #[test]
    fn simple_transition_rejects_invalid_target() {
        let err = simple_transition::<Post>("new", "").unwrap_err();
        assert!(matches!(err, SetupError::InvalidTarget { .. }));
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let transition =
            guarded_transition("new", "published", |post: &Post| post.approved).unwrap();
        let guard = &transition.spec().conditions()[0];
        let args = CallArgs::new();

        let approved = Post { approved: true };
        let pending = Post { approved: false };
        assert!(guard.check(&Invocation::new(&[], &approved, &args)));
        assert!(!guard.check(&Invocation::new(&[], &pending, &args)));
    }
}
