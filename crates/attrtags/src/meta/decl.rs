//! Identifiers and declaration shapes shared by the host model and the tag layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Name of a declared attribute.
pub type AttributeName = String;

/// Identifier of a class or role known to a [`Meta`](super::Meta).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TargetId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Instantiable, single inheritance.
    Class,
    /// Composable bundle of behavior; never instantiated.
    Role,
}

/// How a role is merged into a destination.
///
/// The host copies the role's attributes either way. The role's hooks see
/// which path was taken and decide what else travels with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Application {
    /// Declarative merge: the destination also picks up the abilities the
    /// role propagates (e.g. declaring tagged attributes of its own).
    Propagating,

    /// Copies the role's attributes only.
    CopyOnly,
}

/// One `has`-style declaration: one or more attribute names sharing a set of options.
///
/// ```
/// use attrtags::meta::AttributeDecl;
///
/// let decl = AttributeDecl::new("c1_1")
///     .option("is", "ro")
///     .option("tag1", "c1_1.t1");
/// assert_eq!(decl.options()["tag1"], "c1_1.t1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDecl {
    names: BTreeSet<AttributeName>,
    options: BTreeMap<String, Value>,
}

impl AttributeDecl {
    pub fn new(name: impl Into<AttributeName>) -> Self {
        Self::many([name])
    }

    /// Declare several attributes at once; they share every option.
    pub fn many<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AttributeName>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            options: BTreeMap::new(),
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn names(&self) -> &BTreeSet<AttributeName> {
        &self.names
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }
}

/// A constructed object. Only remembers which class built it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    id: Uuid,
    class: TargetId,
}

impl Instance {
    pub(crate) fn new(class: TargetId) -> Self {
        Self {
            id: Uuid::new_v4(),
            class,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn class(&self) -> &TargetId {
        &self.class
    }
}
