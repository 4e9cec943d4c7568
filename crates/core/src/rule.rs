//! Rules and the ordered rule store.

use std::sync::Arc;

use crate::action::{Action, Actions};
use crate::resource::{Resource, ResourceType, ResourceTypes};

/// Predicate deciding whether a conditional rule applies to a concrete
/// instance. `P` is the principal type the evaluator is generic over; the
/// second argument is the instance (or, for nested resources, the parent)
/// being checked.
pub type Condition<P> = Arc<dyn Fn(&P, &dyn Resource) -> bool + Send + Sync>;

/// A single allow/deny declaration for an (action, resource type) pair, with
/// an optional instance predicate. Immutable once created.
pub struct Rule<P> {
    allowed: bool,
    action: Action,
    resource_type: ResourceType,
    condition: Option<Condition<P>>,
}

impl<P> Rule<P> {
    pub fn new(
        allowed: bool,
        action: Action,
        resource_type: ResourceType,
        condition: Option<Condition<P>>,
    ) -> Self {
        Self {
            allowed,
            action,
            resource_type,
            condition,
        }
    }

    /// True for a privilege (`allow`), false for a restriction (`deny`).
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn is_restriction(&self) -> bool {
        !self.allowed
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// Does this rule's action cover any of the requested action names?
    /// A `manage` rule covers everything.
    pub fn matches_action(&self, names: &[Action]) -> bool {
        self.action.is_manage() || names.contains(&self.action)
    }

    /// Does this rule's resource type cover the requested one?
    /// An `all` rule covers everything.
    pub fn matches_resource(&self, resource_type: &ResourceType) -> bool {
        self.resource_type.is_all() || self.resource_type == *resource_type
    }

    pub fn is_relevant(&self, names: &[Action], resource_type: &ResourceType) -> bool {
        self.matches_action(names) && self.matches_resource(resource_type)
    }

    /// Under this rule alone, is the action allowed?
    ///
    /// Unconditional rules contribute their `allowed` flag. Conditional rules
    /// evaluate the predicate against the instance; a conditional restriction
    /// blocks exactly when its predicate holds, so its signal is the negation.
    /// A conditional rule with no instance to inspect fails closed.
    pub fn signal(&self, principal: &P, value: Option<&dyn Resource>) -> bool {
        match (&self.condition, value) {
            (None, _) => self.allowed,
            (Some(condition), Some(value)) => {
                let hit = condition(principal, value);
                if self.allowed { hit } else { !hit }
            }
            (Some(_), None) => false,
        }
    }
}

impl<P> Clone for Rule<P> {
    fn clone(&self) -> Self {
        Self {
            allowed: self.allowed,
            action: self.action.clone(),
            resource_type: self.resource_type.clone(),
            condition: self.condition.clone(),
        }
    }
}

impl<P> core::fmt::Debug for Rule<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rule")
            .field("allowed", &self.allowed)
            .field("action", &self.action)
            .field("resource_type", &self.resource_type)
            .field("condition", &self.condition.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// Append-only, insertion-ordered collection of rules.
///
/// Insertion order is semantically significant: it is the order the evaluator
/// folds relevant rules in. Rules are never reordered or deduplicated.
pub struct RuleStore<P> {
    rules: Vec<Rule<P>>,
}

impl<P> RuleStore<P> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<P>> {
        self.rules.iter()
    }

    /// Append one rule per (action × resource type) combination. The
    /// condition, if any, is shared between the created rules.
    ///
    /// Returns the rules created by this call.
    pub fn add_rules(
        &mut self,
        allowed: bool,
        actions: impl Into<Actions>,
        resource_types: impl Into<ResourceTypes>,
        condition: Option<Condition<P>>,
    ) -> &[Rule<P>] {
        let actions = actions.into();
        let resource_types = resource_types.into();
        let start = self.rules.len();
        for action in actions.iter() {
            for resource_type in resource_types.iter() {
                self.rules.push(Rule::new(
                    allowed,
                    action.clone(),
                    resource_type.clone(),
                    condition.clone(),
                ));
            }
        }
        &self.rules[start..]
    }

    /// Every rule relevant to the given action names and resource type, in
    /// insertion order.
    pub fn relevant_rules(
        &self,
        names: &[Action],
        resource_type: &ResourceType,
    ) -> Vec<&Rule<P>> {
        self.rules
            .iter()
            .filter(|rule| rule.is_relevant(names, resource_type))
            .collect()
    }
}

impl<P> Default for RuleStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for RuleStore<P> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<P> core::fmt::Debug for RuleStore<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RuleStore").field("rules", &self.rules).finish()
    }
}
