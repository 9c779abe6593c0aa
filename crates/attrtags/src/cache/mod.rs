//! # Tag Cache
//!
//! The per-class flattened view of a chain, built once and shared by the
//! class and all of its instances.
//!
//! ## Indices
//!
//! | Index | Shape |
//! |-------|-------|
//! | by tag | `tag -> attribute -> value` |
//! | by attribute | `attribute -> tag -> value` |
//!
//! ## Precedence
//!
//! Levels are folded from least specific to most specific, and records
//! within a level in insertion order. The last value folded for a
//! `(tag, attribute)` pair wins, so a class's own declaration beats a role's
//! or a parent's, and a later re-declaration beats an earlier one.
//!
//! ## Staleness
//!
//! A cache is never invalidated. Tagged behavior merged into a class after
//! its cache was built stays invisible to that class and to all of its
//! instances, old and new.

mod locked;

pub use locked::LockedMap;

use crate::chain::ChainLevel;
use crate::meta::{AttributeName, TargetId};
use crate::tags::{TagName, TagValue};
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Immutable tag indices for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct TagCache {
    class: TargetId,
    by_tag: LockedMap<TagName, LockedMap<AttributeName, TagValue>>,
    by_attribute: LockedMap<AttributeName, LockedMap<TagName, TagValue>>,
}

impl TagCache {
    /// Fold chain levels (most specific first, as walked) into indices.
    pub fn build(class: &TargetId, levels: &[ChainLevel]) -> Self {
        let mut by_tag: BTreeMap<TagName, BTreeMap<AttributeName, TagValue>> = BTreeMap::new();
        let mut by_attribute: BTreeMap<AttributeName, BTreeMap<TagName, TagValue>> =
            BTreeMap::new();

        for record in levels.iter().rev().flat_map(|level| &level.records) {
            for attribute in &record.attributes {
                by_tag
                    .entry(record.tag.clone())
                    .or_default()
                    .insert(attribute.clone(), record.value.clone());
                by_attribute
                    .entry(attribute.clone())
                    .or_default()
                    .insert(record.tag.clone(), record.value.clone());
            }
        }

        Self {
            class: class.clone(),
            by_tag: lock_nested("tags index", "tag", by_tag),
            by_attribute: lock_nested("attributes index", "attribute", by_attribute),
        }
    }

    pub fn class(&self) -> &TargetId {
        &self.class
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// `attribute -> value` for one tag; empty if the tag was never used.
    pub fn by_tag(&self, tag: &str) -> LockedMap<AttributeName, TagValue> {
        self.by_tag
            .get(tag)
            .cloned()
            .unwrap_or_else(|| LockedMap::empty(format!("tag '{tag}'")))
    }

    /// `tag -> value` for one attribute; empty if the attribute has no tags.
    pub fn by_attribute(&self, attribute: &str) -> LockedMap<TagName, TagValue> {
        self.by_attribute
            .get(attribute)
            .cloned()
            .unwrap_or_else(|| LockedMap::empty(format!("attribute '{attribute}'")))
    }

    pub fn tags_for_attribute(&self, attribute: &str) -> BTreeSet<TagName> {
        self.by_attribute
            .get(attribute)
            .map(|tags| tags.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn value(&self, attribute: &str, tag: &str) -> Option<&TagValue> {
        self.by_attribute
            .get(attribute)
            .and_then(|tags| tags.get(tag))
    }

    /// Every tag used by at least one attribute.
    pub fn tag_names(&self) -> impl Iterator<Item = &TagName> {
        self.by_tag.keys()
    }

    /// Every attribute carrying at least one tag.
    pub fn attribute_names(&self) -> impl Iterator<Item = &AttributeName> {
        self.by_attribute.keys()
    }

    /// The by-tag index as a plain nested map, for callers that index it
    /// directly: `cache.as_nested()["tag1"]["attr"]`.
    pub fn as_nested(&self) -> &LockedMap<TagName, LockedMap<AttributeName, TagValue>> {
        &self.by_tag
    }

    pub fn by_attribute_index(&self) -> &LockedMap<AttributeName, LockedMap<TagName, TagValue>> {
        &self.by_attribute
    }
}

fn lock_nested(
    label: &str,
    kind: &str,
    map: BTreeMap<String, BTreeMap<String, TagValue>>,
) -> LockedMap<String, LockedMap<String, TagValue>> {
    let locked = map
        .into_iter()
        .map(|(key, inner)| {
            let inner = LockedMap::new(format!("{kind} '{key}'"), inner);
            (key, inner)
        })
        .collect();
    LockedMap::new(label, locked)
}

/// Memoized caches, one per class.
///
/// Each class gets its own once-initialized cell, so a cache is built at
/// most once even when several callers race for it.
#[derive(Debug, Default)]
pub struct CacheStore {
    cells: RwLock<HashMap<TargetId, Arc<OnceCell<Arc<TagCache>>>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value for `class`, building it with `build` on first access.
    pub fn get_or_build(
        &self,
        class: &TargetId,
        build: impl FnOnce() -> TagCache,
    ) -> Arc<TagCache> {
        let cell = self.cell(class);
        cell.get_or_init(|| {
            let cache = build();
            debug!(
                %class,
                tags = cache.by_tag.len(),
                attributes = cache.by_attribute.len(),
                "built tag cache"
            );
            Arc::new(cache)
        })
        .clone()
    }

    /// The cache for `class` if it has already been built.
    pub fn get(&self, class: &TargetId) -> Option<Arc<TagCache>> {
        self.cells
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class)
            .and_then(|cell| cell.get().cloned())
    }

    fn cell(&self, class: &TargetId) -> Arc<OnceCell<Arc<TagCache>>> {
        if let Some(cell) = self
            .cells
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class)
        {
            return cell.clone();
        }
        self.cells
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(class.clone())
            .or_default()
            .clone()
    }
}
