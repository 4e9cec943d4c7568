//! `authority-core` — pure domain primitives for declarative authorization.
//!
//! This crate contains the rule/alias model only (names, rules, alias
//! expansion). Decision evaluation and denial message resolution live in the
//! `authority` crate; HTTP, storage and dependency wiring are intentionally
//! outside both.

pub mod action;
pub mod alias;
pub mod error;
pub mod resource;
pub mod rule;

pub use action::{Action, Actions};
pub use alias::AliasTable;
pub use error::ConfigError;
pub use resource::{Resource, ResourceRef, ResourceType, ResourceTypes};
pub use rule::{Condition, Rule, RuleStore};
