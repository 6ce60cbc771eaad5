//! Handler groups: one transition implemented by several member handlers.

use crate::builder::error::SetupError;
use crate::builder::transition::Transition;
use crate::core::ExtraArg;
use std::fmt;
use std::sync::Arc;

type OwnerFactory = Arc<dyn Fn() -> ExtraArg + Send + Sync>;

/// A set of member transitions sharing an owner value.
///
/// Each member inherits the group's sources, target and guards. A fresh
/// owner is produced every time the group is bound and handed to every
/// member's guards and handler as the first extra argument.
///
/// ```
/// use fieldfsm::builder::{transition, HandlerGroup};
/// use fieldfsm::core::Handler;
///
/// struct Post;
///
/// #[derive(Clone)]
/// struct Publisher {
///     channel: &'static str,
/// }
///
/// let group: HandlerGroup<Post> = HandlerGroup::new()
///     .owner(Publisher { channel: "feed" })
///     .member("from_new", transition().source("new").handler(Handler::noop()))
///     .member("from_hidden", transition().source("hidden").handler(Handler::noop()));
///
/// assert_eq!(group.len(), 2);
/// ```
pub struct HandlerGroup<R> {
    owner: OwnerFactory,
    members: Vec<(String, Transition<R>)>,
    errors: Vec<SetupError>,
}

impl<R> HandlerGroup<R> {
    pub fn new() -> Self {
        Self {
            owner: Arc::new(|| Arc::new(()) as ExtraArg),
            members: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Set the owner value. Each bind receives its own clone.
    pub fn owner<T>(mut self, owner: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.owner = Arc::new(move || Arc::new(owner.clone()) as ExtraArg);
        self
    }

    /// Add a member transition.
    ///
    /// Declaration errors are kept and reported when the group is used.
    pub fn member(
        mut self,
        name: impl Into<String>,
        transition: Result<Transition<R>, SetupError>,
    ) -> Self {
        let name = name.into();
        match transition {
            Ok(_) if self.members.iter().any(|(existing, _)| *existing == name) => {
                self.errors.push(SetupError::DuplicateTransition { name });
            }
            Ok(transition) => self.members.push((name, transition)),
            Err(err) => self.errors.push(err),
        }
        self
    }

    pub fn members(&self) -> &[(String, Transition<R>)] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn instantiate_owner(&self) -> ExtraArg {
        (self.owner)()
    }

    pub(crate) fn first_error(&self) -> Option<&SetupError> {
        self.errors.first()
    }
}

impl<R> Default for HandlerGroup<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for HandlerGroup<R> {
    fn clone(&self) -> Self {
        Self {
            owner: Arc::clone(&self.owner),
            members: self.members.clone(),
            errors: self.errors.clone(),
        }
    }
}

impl<R> fmt::Debug for HandlerGroup<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerGroup")
            .field(
                "members",
                &self.members.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("errors", &self.errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::transition::TransitionBuilder;
    use crate::core::Handler;

    struct Post;

    fn member(source: &str) -> Result<Transition<Post>, SetupError> {
        TransitionBuilder::new()
            .source(source)
            .handler(Handler::noop())
    }

    #[test]
    fn default_owner_is_unit() {
        let group: HandlerGroup<Post> = HandlerGroup::new();
        let owner = group.instantiate_owner();
        assert!(owner.downcast_ref::<()>().is_some());
        assert!(group.is_empty());
    }

    #[test]
    fn each_instantiation_is_a_fresh_owner() {
        let group: HandlerGroup<Post> = HandlerGroup::new().owner(String::from("publisher"));

        let first = group.instantiate_owner();
        let second = group.instantiate_owner();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(
            first.downcast_ref::<String>().map(String::as_str),
            Some("publisher")
        );
    }

    #[test]
    fn members_keep_declaration_order() {
        let group = HandlerGroup::new()
            .member("publish", member("new"))
            .member("unhide", member("hidden"));

        let names: Vec<_> = group.members().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["publish", "unhide"]);
        assert!(group.first_error().is_none());
    }

    #[test]
    fn duplicate_member_is_recorded() {
        let group = HandlerGroup::new()
            .member("publish", member("new"))
            .member("publish", member("hidden"));

        assert_eq!(group.len(), 1);
        assert_eq!(
            group.first_error(),
            Some(&SetupError::DuplicateTransition {
                name: "publish".into()
            })
        );
    }

    #[test]
    fn member_error_is_recorded() {
        let group = HandlerGroup::new().member("broken", member(""));

        assert!(group.is_empty());
        assert!(matches!(
            group.first_error(),
            Some(SetupError::InvalidSource { .. })
        ));
    }
}
