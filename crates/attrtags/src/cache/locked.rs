//! Read-only shared map.

use crate::error::{AttrTagsError, Result};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;
use tracing::warn;

/// An immutable, cheaply cloned map.
///
/// Clones share storage. The mutation methods exist so that code written
/// against a mutable map fails loudly with [`AttrTagsError::Locked`] instead
/// of silently diverging from the shared cache.
#[derive(Clone)]
pub struct LockedMap<K, V> {
    label: Arc<str>,
    inner: Arc<BTreeMap<K, V>>,
}

impl<K: Ord, V> LockedMap<K, V> {
    pub(crate) fn new(label: impl Into<Arc<str>>, map: BTreeMap<K, V>) -> Self {
        Self {
            label: label.into(),
            inner: Arc::new(map),
        }
    }

    pub(crate) fn empty(label: impl Into<Arc<str>>) -> Self {
        Self::new(label, BTreeMap::new())
    }

    /// What this map is, as used in lock errors.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether two handles share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Always fails: the map is locked.
    pub fn try_insert(&mut self, _key: K, _value: V) -> Result<Option<V>> {
        Err(self.locked("insert"))
    }

    /// Always fails: the map is locked.
    pub fn try_remove<Q>(&mut self, _key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Err(self.locked("remove"))
    }

    /// Always fails: the map is locked.
    pub fn try_clear(&mut self) -> Result<()> {
        Err(self.locked("clear"))
    }

    fn locked(&self, op: &str) -> AttrTagsError {
        warn!(structure = %self.label, op, "attempted to modify a locked tag index");
        AttrTagsError::Locked {
            structure: self.label.to_string(),
        }
    }

    /// Copy the contents out into an ordinary, owned map.
    pub fn to_btree_map(&self) -> BTreeMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        (*self.inner).clone()
    }
}

impl<K, V, Q> Index<&Q> for LockedMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        &self.inner[key]
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a LockedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::collections::btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// Equality looks at contents only, not labels.
impl<K: PartialEq, V: PartialEq> PartialEq for LockedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LockedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}
