//! Black-box tests of the decision engine: precedence, aliases, conditions,
//! nested resources, denial raising.

use std::any::Any;

use authority::{Action, AccessDenied, Authority, Resource, ResourceRef, ResourceType};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
struct User {
    id: u64,
    email: String,
    name: String,
}

impl User {
    fn new(id: u64, email: &str, name: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            name: name.to_string(),
        }
    }
}

// Checked *resources* named "User" (distinct from the principal).
impl Resource for User {
    fn resource_type(&self) -> ResourceType {
        ResourceType::new("User")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Project {
    user_id: u64,
}

impl Resource for Project {
    fn resource_type(&self) -> ResourceType {
        ResourceType::new("Project")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Category {
    visible: bool,
}

impl Resource for Category {
    fn resource_type(&self) -> ResourceType {
        ResourceType::new("Category")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn test_user() -> User {
    User::new(1, "testuser@localhost", "TestUser")
}

fn authority() -> Authority<User> {
    Authority::new(test_user())
}

fn as_project(value: &dyn Resource) -> Option<&Project> {
    value.as_any().downcast_ref::<Project>()
}

fn as_user(value: &dyn Resource) -> Option<&User> {
    value.as_any().downcast_ref::<User>()
}

#[test]
fn stores_the_current_principal() {
    let mut authority = authority();
    assert_eq!(authority.current_principal(), &test_user());

    let other = User::new(2, "other@localhost", "Other");
    authority.set_current_principal(other.clone());
    assert_eq!(authority.current_principal(), &other);
}

#[test]
fn evaluates_rules_on_an_instance() {
    let mut authority = authority();
    let before = authority.rules().len();
    authority.allow_if("destroy", "Project", |me: &User, value| {
        as_project(value).is_some_and(|project| project.user_id == me.id)
    });
    assert!(authority.rules().len() > before);

    let own = Project { user_id: 1 };
    assert!(authority.can("destroy", &own));

    let someone_elses = Project { user_id: 42 };
    assert!(authority.cannot("destroy", &someone_elses));
}

// A principal cannot do anything without rules.
#[test]
fn cannot_do_anything_without_rules() {
    let authority = authority();
    let project = Project { user_id: 1 };

    assert!(authority.rules().is_empty());

    for action in ["read", "create", "update", "delete", "manage"] {
        assert!(authority.cannot(action, "all"));
        assert!(authority.cannot(action, &project));
        assert!(authority.cannot(action, "Project"));
    }
}

// A deny rule overrides prior rules.
#[test]
fn deny_rule_overrides_prior_rules() {
    let mut authority = authority();
    authority.allow("manage", "Project");
    authority.deny("destroy", "Project");

    let project = Project { user_id: 1 };
    assert!(authority.cannot("destroy", &project));
    assert!(authority.can("read", &project));
    assert!(authority.can("update", &project));
}

// Allow rules do not override prior rules; they are logically OR'ed.
#[test]
fn allow_rules_are_ored() {
    let mut authority = authority();
    authority.allow_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.id != 1) // false for admin
    });
    authority.allow_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.email == "admin@localhost") // true
    });
    authority.allow_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.name != "Administrator") // false
    });

    let admin = User::new(1, "admin@localhost", "Administrator");
    // One true allow condition is enough, even sandwiched between false ones.
    assert!(authority.can("index", &admin));
}

// Port of the original precedence ladder: conditional allows, an
// unconditional allow, a firing conditional deny, a later allow overriding
// it, and a final unconditional deny.
#[test]
fn rule_precedence_ladder() {
    let mut authority = authority();
    let admin = User::new(1, "admin@localhost", "Administrator");

    authority.allow_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.id != 1)
    });
    authority.allow_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.email != "admin@localhost")
    });
    authority.allow_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.name != "Administrator")
    });
    authority.allow("update", "User");

    assert!(authority.can("update", "User"));
    assert!(authority.can("update", &admin));

    // Bare type check is decided by rule presence, not conditions.
    assert!(authority.can("index", "User"));

    // Against the instance every condition is false.
    assert!(authority.cannot("index", &admin));

    // One unconditional allow flips the OR.
    authority.allow("index", "User");
    assert!(authority.can("index", &admin));

    // A firing conditional deny forces the result down...
    authority.deny_if("read", "User", |_, value| {
        as_user(value).is_some_and(|user| user.name == "Administrator")
    });
    assert!(authority.cannot("index", &admin));

    // ...until a later allow overrides it...
    authority.allow("index", "User");
    assert!(authority.can("index", &admin));

    // ...and an unconditional deny is final within this scope.
    authority.deny("index", "User");
    assert!(authority.cannot("index", &admin));
}

#[test]
fn default_alias_actions() {
    let authority = authority();

    let aliases = |a: &'static str| authority.aliases_for_action(a);
    assert_eq!(aliases("index"), vec![Action::new("read")]);
    assert_eq!(aliases("show"), vec![Action::new("read")]);
    assert_eq!(aliases("new"), vec![Action::new("create")]);
    assert_eq!(aliases("store"), vec![Action::new("create")]);
    assert_eq!(aliases("edit"), vec![Action::new("update")]);
    assert_eq!(aliases("destroy"), vec![Action::new("delete")]);

    let expand = |a: &'static str| {
        authority
            .expand_actions(a)
            .into_iter()
            .map(|a| a.as_str().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(expand("read"), ["read", "index", "show"]);
    assert_eq!(expand("create"), ["create", "new", "store"]);
    assert_eq!(expand("update"), ["update", "edit"]);
    assert_eq!(expand("delete"), ["delete", "destroy"]);
}

#[test]
fn alias_collision_is_a_configuration_error() {
    let mut authority = authority();
    // `destroy` is already the aliased leaf of `delete`.
    assert!(authority.add_alias("destroy", ["erase"]).is_err());
    // A fresh vocabulary accepts it.
    authority.clear_aliased_actions();
    assert!(authority.add_alias("destroy", ["erase"]).is_ok());
}

#[test]
fn redefined_vocabulary_drives_decisions() {
    let mut authority = authority();
    authority.clear_aliased_actions();
    authority.add_alias("moderate", ["approve", "reject"]).unwrap();
    authority.allow("moderate", "Comment");

    assert!(authority.can("approve", "Comment"));
    assert!(authority.can("reject", "Comment"));
    assert!(authority.cannot("index", "Comment"));
}

// Nested resources: rules are keyed on the child type while the condition
// inspects the parent instance.
#[test]
fn nested_resource_dispatch() {
    let mut authority = authority();
    authority.allow_if("create", "Project", |_, value| {
        value
            .as_any()
            .downcast_ref::<Category>()
            .is_some_and(|category| category.visible)
    });

    let visible = Category { visible: true };
    let hidden = Category { visible: false };
    assert!(authority.can("create", ResourceRef::scoped("Project", &visible)));
    assert!(authority.cannot("create", ResourceRef::scoped("Project", &hidden)));
}

#[test]
fn manage_and_all_wildcards() {
    let mut authority = authority();
    authority.allow("manage", "all");

    let project = Project { user_id: 9 };
    assert!(authority.can("destroy", &project));
    assert!(authority.can("whatever", "Anything"));

    authority.deny("destroy", "Project");
    assert!(authority.cannot("destroy", &project));
    assert!(authority.can("destroy", "Task"));
}

#[test]
fn authorize_returns_the_resource_or_raises() {
    let mut authority = authority();
    authority.allow("read", "Project");

    let project = Project { user_id: 1 };
    let passed = authority.authorize("show", &project).expect("authorized");
    assert_eq!(passed.resource_type(), ResourceType::new("Project"));

    let denied: AccessDenied = authority.authorize("destroy", &project).unwrap_err();
    assert_eq!(denied.action, Action::new("destroy"));
    assert_eq!(denied.subject, ResourceType::new("Project"));
    assert_eq!(denied.to_string(), denied.message);
}

#[test]
fn authorize_uses_catalog_templates() {
    let mut authority = authority();
    authority.messages_mut().insert(
        "en",
        "unauthorized.destroy.project",
        "You may not {action} this {subject}.",
    );

    let denied = authority.authorize("destroy", "Project").unwrap_err();
    assert_eq!(denied.message, "You may not destroy this project.");
}

proptest! {
    // Fail-closed: with no rules registered, every (action, type) pair is
    // denied.
    #[test]
    fn fail_closed_without_rules(action in "[a-z]{1,12}", resource in "[A-Z][a-zA-Z]{0,11}") {
        let authority = authority();
        prop_assert!(authority.cannot(Action::new(action), ResourceType::new(resource)));
    }

    // Expansion always starts with the queried action and never shrinks on a
    // second pass (idempotence over the flattened set).
    #[test]
    fn expansion_is_idempotent(action in "[a-z]{1,12}") {
        let authority = authority();
        let first = authority.expand_actions(Action::new(action.clone()));
        prop_assert_eq!(first.first(), Some(&Action::new(action)));
        let again = authority.expand_actions(first.clone());
        prop_assert_eq!(first, again);
    }
}
