use std::any::Any;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Symbolic name for a class of protected entities (e.g. `Project`).
///
/// A rule declared for the reserved name `"all"` matches every resource type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(Cow<'static, str>);

impl ResourceType {
    /// Reserved rule resource type matching every resource type.
    pub const ALL: &'static str = "all";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved `"all"` wildcard.
    pub fn is_all(&self) -> bool {
        self.as_str() == Self::ALL
    }
}

impl core::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ResourceType {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// One or more resource type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypes(Vec<ResourceType>);

impl ResourceTypes {
    pub fn as_slice(&self) -> &[ResourceType] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ResourceType> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.0.iter()
    }
}

impl IntoIterator for ResourceTypes {
    type Item = ResourceType;
    type IntoIter = std::vec::IntoIter<ResourceType>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<ResourceType> for ResourceTypes {
    fn from(value: ResourceType) -> Self {
        Self(vec![value])
    }
}

impl From<&'static str> for ResourceTypes {
    fn from(value: &'static str) -> Self {
        Self(vec![ResourceType::new(value)])
    }
}

impl From<String> for ResourceTypes {
    fn from(value: String) -> Self {
        Self(vec![ResourceType::new(value)])
    }
}

impl From<Vec<ResourceType>> for ResourceTypes {
    fn from(value: Vec<ResourceType>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[&'static str; N]> for ResourceTypes {
    fn from(value: [&'static str; N]) -> Self {
        Self(value.into_iter().map(ResourceType::new).collect())
    }
}

/// A protected domain object.
///
/// `resource_type` is the logical type name rules are matched against. Proxy
/// or test-double objects should report the type they stand in for, not their
/// own; rule matching only ever sees the logical name.
pub trait Resource {
    fn resource_type(&self) -> ResourceType;

    /// Downcasting access for rule conditions.
    fn as_any(&self) -> &dyn Any;
}

/// A resource reference as supplied to `can`/`cannot`/`authorize`.
///
/// The original API accepted a type name, an instance, or a one-entry map
/// `{ChildType: parent_instance}` and branched on the runtime shape; here the
/// three shapes are an explicit union built at the call site.
#[derive(Clone)]
pub enum ResourceRef<'a> {
    /// A bare type name, no instance (e.g. checking `index` against a class).
    Type(ResourceType),
    /// A concrete instance; its `resource_type()` is the matched type and the
    /// instance itself is what conditions inspect.
    Instance(&'a dyn Resource),
    /// Matched type and condition value supplied separately. This expresses
    /// nested resources: rules are keyed on the child type while conditions
    /// inspect the parent instance. It also covers an explicit
    /// (type, instance) pair for an instance whose logical type is overridden.
    Scoped(ResourceType, &'a dyn Resource),
}

impl<'a> ResourceRef<'a> {
    pub fn named(name: impl Into<ResourceType>) -> Self {
        Self::Type(name.into())
    }

    pub fn instance(resource: &'a dyn Resource) -> Self {
        Self::Instance(resource)
    }

    pub fn scoped(name: impl Into<ResourceType>, value: &'a dyn Resource) -> Self {
        Self::Scoped(name.into(), value)
    }

    /// The type name rules are matched against.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Type(name) | Self::Scoped(name, _) => name.clone(),
            Self::Instance(resource) => resource.resource_type(),
        }
    }

    /// The instance conditions are evaluated against, if any.
    pub fn value(&self) -> Option<&'a dyn Resource> {
        match self {
            Self::Type(_) => None,
            Self::Instance(resource) => Some(*resource),
            Self::Scoped(_, value) => Some(*value),
        }
    }

    /// True when only a type name was supplied.
    pub fn is_bare_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }
}

impl<'a, R: Resource> From<&'a R> for ResourceRef<'a> {
    fn from(value: &'a R) -> Self {
        Self::Instance(value)
    }
}

impl<'a> From<&'static str> for ResourceRef<'a> {
    fn from(value: &'static str) -> Self {
        Self::Type(ResourceType::new(value))
    }
}

impl<'a> From<String> for ResourceRef<'a> {
    fn from(value: String) -> Self {
        Self::Type(ResourceType::new(value))
    }
}

impl<'a> From<ResourceType> for ResourceRef<'a> {
    fn from(value: ResourceType) -> Self {
        Self::Type(value)
    }
}

impl core::fmt::Debug for ResourceRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Type(name) => f.debug_tuple("Type").field(name).finish(),
            Self::Instance(resource) => {
                f.debug_tuple("Instance").field(&resource.resource_type()).finish()
            }
            Self::Scoped(name, value) => f
                .debug_tuple("Scoped")
                .field(name)
                .field(&value.resource_type())
                .finish(),
        }
    }
}
