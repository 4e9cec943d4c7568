//! Action alias vocabulary.

use std::collections::BTreeMap;

use crate::action::{Action, Actions};
use crate::error::ConfigError;

/// Mapping from alias targets to the concrete actions they stand for.
///
/// A target (e.g. `read`) names a set of member actions (e.g. `index`,
/// `show`). Rules written against a target match any of its members at
/// decision time; members may themselves be targets, so aliases chain.
///
/// The invariant the table maintains is that a name is never both a target
/// and a member of some other target's set. [`AliasTable::add_alias`] rejects
/// violations, which is what keeps [`AliasTable::expand_actions`] finite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<Action, Vec<Action>>,
}

impl AliasTable {
    const DEFAULTS: [(&'static str, &'static [&'static str]); 4] = [
        ("read", &["index", "show"]),
        ("create", &["new", "store"]),
        ("update", &["edit"]),
        ("delete", &["destroy"]),
    ];

    /// An empty table with no vocabulary at all.
    pub fn new() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// A table pre-populated with the conventional REST aliases:
    /// `read → {index, show}`, `create → {new, store}`, `update → {edit}`,
    /// `delete → {destroy}`.
    pub fn with_defaults() -> Self {
        let mut aliases = BTreeMap::new();
        for (target, members) in Self::DEFAULTS {
            aliases.insert(
                Action::new(target),
                members.iter().map(|m| Action::new(*m)).collect(),
            );
        }
        Self { aliases }
    }

    /// Re-register the default aliases on top of the current vocabulary.
    ///
    /// Fails like [`AliasTable::add_alias`] would if a default target has
    /// since been used as a member name.
    pub fn install_defaults(&mut self) -> Result<(), ConfigError> {
        for (target, members) in Self::DEFAULTS {
            let members: Vec<Action> = members.iter().map(|m| Action::new(*m)).collect();
            self.add_alias(target, members)?;
        }
        Ok(())
    }

    /// Remove every alias, including the defaults.
    ///
    /// The table stays empty until aliases are registered again; consumers
    /// redefining the vocabulary from scratch start here.
    pub fn clear(&mut self) {
        self.aliases.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Registered alias targets, in deterministic order.
    pub fn targets(&self) -> impl Iterator<Item = &Action> {
        self.aliases.keys()
    }

    /// Member actions registered under `target`, if it is a target.
    pub fn members(&self, target: &Action) -> Option<&[Action]> {
        self.aliases.get(target).map(Vec::as_slice)
    }

    /// Register that `actions` are aliased by `target`.
    ///
    /// Re-adding a target merges with set-union semantics (no duplicates).
    /// Fails when `target` already appears as a member of another target's
    /// set; allowing that would make a name both a leaf and an alias and the
    /// expansion recursion would never terminate.
    pub fn add_alias(
        &mut self,
        target: impl Into<Action>,
        actions: impl Into<Actions>,
    ) -> Result<(), ConfigError> {
        let target = target.into();
        let actions = actions.into();

        if self.is_member(&target) {
            return Err(ConfigError::alias_collision(target.as_str()));
        }

        let members = self.aliases.entry(target).or_default();
        for action in actions {
            if !members.contains(&action) {
                members.push(action);
            }
        }
        Ok(())
    }

    fn is_member(&self, name: &Action) -> bool {
        self.aliases.values().any(|members| members.contains(name))
    }

    /// Flatten the given names into every concrete action reachable through
    /// the alias vocabulary. A name that is itself a target expands to itself
    /// followed by the expansion of its members, recursively; the result is
    /// deduplicated in first-occurrence order.
    pub fn expand_actions(&self, actions: impl Into<Actions>) -> Vec<Action> {
        let mut expanded = Vec::new();
        for action in actions.into() {
            self.expand_into(&action, &mut expanded);
        }
        expanded
    }

    fn expand_into(&self, action: &Action, out: &mut Vec<Action>) {
        if out.contains(action) {
            return;
        }
        out.push(action.clone());
        if let Some(members) = self.aliases.get(action) {
            for member in members {
                self.expand_into(member, out);
            }
        }
    }

    /// Inverse lookup: every target whose expansion (excluding the target
    /// itself) reaches one of the given names. Transitive, so with
    /// `moderate → {read}` on top of the defaults, `index` is subsumed by
    /// both `read` and `moderate`. The queried names themselves are never
    /// part of the result.
    pub fn aliases_for_action(&self, actions: impl Into<Actions>) -> Vec<Action> {
        let names = actions.into();
        let mut results = Vec::new();
        for target in self.aliases.keys() {
            let expansion = self.expand_actions(target.clone());
            let subsumes = expansion[1..]
                .iter()
                .any(|action| names.as_slice().contains(action));
            if subsumes && !results.contains(target) {
                results.push(target.clone());
            }
        }
        results
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
