use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Symbolic action identifier (e.g. `read`, `destroy`).
///
/// Actions are modeled as opaque strings. A rule declared for the reserved
/// name `"manage"` matches every requested action.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Action {
    /// Reserved rule action matching every requested action.
    pub const MANAGE: &'static str = "manage";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved `"manage"` wildcard.
    pub fn is_manage(&self) -> bool {
        self.as_str() == Self::MANAGE
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Action {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// One or more action names.
///
/// Every rule/alias API accepts either a single name or a collection, the way
/// the original surface took a string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions(Vec<Action>);

impl Actions {
    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Action> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }
}

impl IntoIterator for Actions {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Action> for Actions {
    fn from(value: Action) -> Self {
        Self(vec![value])
    }
}

impl From<&'static str> for Actions {
    fn from(value: &'static str) -> Self {
        Self(vec![Action::new(value)])
    }
}

impl From<String> for Actions {
    fn from(value: String) -> Self {
        Self(vec![Action::new(value)])
    }
}

impl From<Vec<Action>> for Actions {
    fn from(value: Vec<Action>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[&'static str; N]> for Actions {
    fn from(value: [&'static str; N]) -> Self {
        Self(value.into_iter().map(Action::new).collect())
    }
}
