//! `authority` — declarative allow/deny authorization with action aliases.
//!
//! Rules are declared up front against (action, resource type) pairs, then
//! folded into a boolean decision at check time. Conditional rules carry a
//! predicate over (principal, instance); action aliases let rules written
//! against `read` cover `index` and `show`.
//!
//! ```
//! use authority::{Authority, Resource, ResourceType};
//! use std::any::Any;
//!
//! struct User { id: u64 }
//!
//! struct Project { owner_id: u64 }
//!
//! impl Resource for Project {
//!     fn resource_type(&self) -> ResourceType { ResourceType::new("Project") }
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! let mut authority = Authority::new(User { id: 1 });
//! authority.allow("read", "Project");
//! authority.allow_if("destroy", "Project", |user: &User, value| {
//!     value.as_any().downcast_ref::<Project>()
//!         .is_some_and(|project| project.owner_id == user.id)
//! });
//!
//! let mine = Project { owner_id: 1 };
//! let theirs = Project { owner_id: 2 };
//! assert!(authority.can("index", &mine));
//! assert!(authority.can("destroy", &mine));
//! assert!(authority.cannot("destroy", &theirs));
//! ```
//!
//! The evaluator is handed its collaborators explicitly: principals are any
//! type of the caller's choosing, resources implement [`Resource`], and the
//! surrounding application decides when an [`AccessDenied`] propagating out
//! of [`Authority::authorize`] becomes an HTTP status or a CLI message.

pub mod denial;
pub mod evaluator;
pub mod messages;

pub use authority_core::{
    Action, Actions, AliasTable, Condition, ConfigError, Resource, ResourceRef, ResourceType,
    ResourceTypes, Rule, RuleStore,
};
pub use denial::AccessDenied;
pub use evaluator::Authority;
pub use messages::{DEFAULT_UNAUTHORIZED_MESSAGE, MessageCatalog};
