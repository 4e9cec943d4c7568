//! Configuration-time error model.

use thiserror::Error;

/// Error raised while configuring the authorization vocabulary.
///
/// These are fatal at setup time and surfaced immediately to the configurer;
/// nothing in the decision path produces them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Alias targets and concrete member actions must stay disjoint,
    /// otherwise alias expansion would recurse without terminating.
    #[error("cannot alias `{0}`: it is already registered as a concrete action name")]
    AliasTargetIsAction(String),
}

impl ConfigError {
    pub fn alias_collision(name: impl Into<String>) -> Self {
        Self::AliasTargetIsAction(name.into())
    }
}
