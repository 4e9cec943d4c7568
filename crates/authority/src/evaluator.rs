//! The decision engine.

use authority_core::{
    Action, Actions, AliasTable, Condition, ConfigError, Resource, ResourceRef, ResourceType,
    ResourceTypes, Rule, RuleStore,
};

use crate::denial::AccessDenied;
use crate::messages::MessageCatalog;

/// Rule-based authorization evaluator for a single principal.
///
/// Owns the current principal, the action alias vocabulary and the ordered
/// rule store. Expected to be scoped to one decision-making context (e.g. one
/// request): construct it fresh per request, or treat it as read-only after
/// an initialization phase when sharing across threads. There is no interior
/// locking.
///
/// `P` is the application's principal type; conditional rules receive it by
/// reference together with the instance under check.
pub struct Authority<P> {
    principal: P,
    aliases: AliasTable,
    rules: RuleStore<P>,
    messages: MessageCatalog,
}

impl<P> Authority<P> {
    /// Evaluator with the default alias vocabulary, an empty rule store and
    /// the built-in English message catalog.
    pub fn new(principal: P) -> Self {
        Self {
            principal,
            aliases: AliasTable::with_defaults(),
            rules: RuleStore::new(),
            messages: MessageCatalog::new(),
        }
    }

    pub fn current_principal(&self) -> &P {
        &self.principal
    }

    pub fn set_current_principal(&mut self, principal: P) {
        self.principal = principal;
    }

    pub fn rules(&self) -> &RuleStore<P> {
        &self.rules
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageCatalog {
        &mut self.messages
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    // ── Rule registration ────────────────────────────────────────────────

    /// Grant `actions` on `resources` unconditionally.
    pub fn allow(
        &mut self,
        actions: impl Into<Actions>,
        resources: impl Into<ResourceTypes>,
    ) -> &[Rule<P>] {
        self.add_rule(true, actions, resources, None)
    }

    /// Grant `actions` on `resources` when `condition` holds for the
    /// instance being checked.
    pub fn allow_if<F>(
        &mut self,
        actions: impl Into<Actions>,
        resources: impl Into<ResourceTypes>,
        condition: F,
    ) -> &[Rule<P>]
    where
        F: Fn(&P, &dyn Resource) -> bool + Send + Sync + 'static,
    {
        self.add_rule(true, actions, resources, Some(std::sync::Arc::new(condition)))
    }

    /// Restrict `actions` on `resources` unconditionally.
    pub fn deny(
        &mut self,
        actions: impl Into<Actions>,
        resources: impl Into<ResourceTypes>,
    ) -> &[Rule<P>] {
        self.add_rule(false, actions, resources, None)
    }

    /// Restrict `actions` on `resources` when `condition` holds for the
    /// instance being checked.
    pub fn deny_if<F>(
        &mut self,
        actions: impl Into<Actions>,
        resources: impl Into<ResourceTypes>,
        condition: F,
    ) -> &[Rule<P>]
    where
        F: Fn(&P, &dyn Resource) -> bool + Send + Sync + 'static,
    {
        self.add_rule(false, actions, resources, Some(std::sync::Arc::new(condition)))
    }

    /// Append one rule per (action × resource type) combination; insertion
    /// order is decision order. Returns the created rules.
    pub fn add_rule(
        &mut self,
        allowed: bool,
        actions: impl Into<Actions>,
        resources: impl Into<ResourceTypes>,
        condition: Option<Condition<P>>,
    ) -> &[Rule<P>] {
        self.rules.add_rules(allowed, actions, resources, condition)
    }

    // ── Alias vocabulary ─────────────────────────────────────────────────

    /// Register that `actions` are aliased by `target`; see
    /// [`AliasTable::add_alias`].
    pub fn add_alias(
        &mut self,
        target: impl Into<Action>,
        actions: impl Into<Actions>,
    ) -> Result<(), ConfigError> {
        self.aliases.add_alias(target, actions)
    }

    /// Remove every registered alias, including the defaults.
    pub fn clear_aliased_actions(&mut self) {
        self.aliases.clear();
    }

    /// Re-register the default REST aliases.
    pub fn install_default_aliases(&mut self) -> Result<(), ConfigError> {
        self.aliases.install_defaults()
    }

    pub fn aliases_for_action(&self, actions: impl Into<Actions>) -> Vec<Action> {
        self.aliases.aliases_for_action(actions)
    }

    pub fn expand_actions(&self, actions: impl Into<Actions>) -> Vec<Action> {
        self.aliases.expand_actions(actions)
    }

    // ── Decisions ────────────────────────────────────────────────────────

    /// Can the current principal perform `action` on `resource`?
    ///
    /// Relevant rules (the requested action plus every alias target that
    /// subsumes it, filtered by resource type) are folded in insertion order
    /// starting from `false`: restrictions AND their signal into the running
    /// result, privileges OR theirs. A firing deny can therefore be overridden
    /// by a later allow, while an unconditional deny with no later allow is
    /// final. No relevant rules means `false`.
    ///
    /// Conditions inspect instance state, so when `resource` is a bare type
    /// name and any relevant rule carries a condition, the whole fold is
    /// short-circuited to the first relevant rule's flag: a class-level check
    /// (e.g. `index`) is decided by rule presence, trusting that the
    /// finer-grained check happens once a real instance is at hand.
    pub fn can<'a>(
        &self,
        action: impl Into<Action>,
        resource: impl Into<ResourceRef<'a>>,
    ) -> bool {
        let action = action.into();
        let resource = resource.into();
        let resource_type = resource.resource_type();
        let value = resource.value();

        let mut names = vec![action.clone()];
        for target in self.aliases.aliases_for_action(action.clone()) {
            if !names.contains(&target) {
                names.push(target);
            }
        }

        let relevant = self.rules.relevant_rules(&names, &resource_type);

        let allowed = if relevant.is_empty() {
            false
        } else if resource.is_bare_type() && relevant.iter().any(|rule| rule.has_condition()) {
            relevant[0].allowed()
        } else {
            relevant.iter().fold(false, |result, rule| {
                let signal = rule.signal(&self.principal, value);
                if rule.is_restriction() {
                    result && signal
                } else {
                    result || signal
                }
            })
        };

        tracing::debug!(
            action = %action,
            resource_type = %resource_type,
            rules = relevant.len(),
            allowed,
            "authorization decision"
        );

        allowed
    }

    /// Negation of [`Authority::can`].
    pub fn cannot<'a>(
        &self,
        action: impl Into<Action>,
        resource: impl Into<ResourceRef<'a>>,
    ) -> bool {
        !self.can(action, resource)
    }

    /// Check and either pass `resource` back through for chaining, or raise
    /// [`AccessDenied`] with a message resolved from the catalog.
    pub fn authorize<'a>(
        &self,
        action: impl Into<Action>,
        resource: impl Into<ResourceRef<'a>>,
    ) -> Result<ResourceRef<'a>, AccessDenied> {
        self.authorize_inner(action.into(), resource.into(), None)
    }

    /// Like [`Authority::authorize`], with an explicit denial message
    /// overriding the catalog lookup.
    pub fn authorize_with_message<'a>(
        &self,
        action: impl Into<Action>,
        resource: impl Into<ResourceRef<'a>>,
        message: impl Into<String>,
    ) -> Result<ResourceRef<'a>, AccessDenied> {
        self.authorize_inner(action.into(), resource.into(), Some(message.into()))
    }

    fn authorize_inner<'a>(
        &self,
        action: Action,
        resource: ResourceRef<'a>,
        message: Option<String>,
    ) -> Result<ResourceRef<'a>, AccessDenied> {
        if self.can(action.clone(), resource.clone()) {
            return Ok(resource);
        }

        let subject = denial_subject(&resource);
        let message = message
            .unwrap_or_else(|| self.messages.unauthorized_message(&action, &subject, &self.aliases));

        tracing::warn!(action = %action, subject = %subject, "access denied");

        Err(AccessDenied {
            action,
            subject,
            message,
        })
    }
}

impl<P: core::fmt::Debug> core::fmt::Debug for Authority<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authority")
            .field("principal", &self.principal)
            .field("aliases", &self.aliases)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// The type named in a denial. For scoped references this is the value's own
/// type, not the matched key: a nested check on `{Task: project}` denies with
/// subject `Project`, the resource the caller actually holds.
fn denial_subject(resource: &ResourceRef<'_>) -> ResourceType {
    match resource {
        ResourceRef::Type(name) => name.clone(),
        ResourceRef::Instance(instance) => instance.resource_type(),
        ResourceRef::Scoped(_, value) => value.resource_type(),
    }
}
