//! # Tag Service
//!
//! The single entry point for tag tracking. A `TagService` owns the tag
//! registry, every target's chain contributors, and the per-class caches.
//! Clones share that state, so one service is created per program and handed
//! to whatever defines classes and roles.
//!
//! ## Lifecycle
//!
//! ```text
//! track(target, {tags})        registry entry + interceptor (once per target)
//!        │
//! meta.has / apply_role / extends
//!        │                     interceptor appends contributors
//!        ▼
//! tags_for_class(class)        chain walk + fold, memoized per class
//! ```
//!
//! Tracking is opt-in. A class with nothing tracking in its composition or
//! inheritance graph gets an empty cache, never an error.
//!
//! Tagged behavior can only be added to classes and roles. There is no way
//! to attach it to a single live instance.

use crate::cache::{CacheStore, LockedMap, TagCache};
use crate::chain::ChainStore;
use crate::config::ServiceConfig;
use crate::error::{AttrTagsError, Result};
use crate::interceptor::{AttributeInterceptor, ChainCarrier};
use crate::meta::{AttributeName, Instance, Meta, TargetId, TargetKind};
use crate::registry::TagRegistry;
use crate::tags::{TagName, TagRecord, TagValue, TrackOptions};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    config: ServiceConfig,
    registry: TagRegistry,
    chains: ChainStore,
    caches: CacheStore,
    carriers: RwLock<HashSet<TargetId>>,
}

/// Shared tag tracking state. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct TagService {
    inner: Arc<Inner>,
}

impl TagService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                ..Default::default()
            }),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub(crate) fn chains(&self) -> &ChainStore {
        &self.inner.chains
    }

    /// The tag tracking directive.
    ///
    /// `options` is a map whose only recognized key is `tags` (a name or a
    /// list of names). Unknown keys fail before anything is registered.
    pub fn track(&self, meta: &mut Meta, target: &TargetId, options: &Value) -> Result<()> {
        let options = TrackOptions::from_value(options)?;
        self.track_options(meta, target, options)
    }

    /// Typed form of [`track`](Self::track).
    pub fn track_tags<I, S>(&self, meta: &mut Meta, target: &TargetId, tags: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<TagName>,
    {
        self.track_options(meta, target, TrackOptions::new(tags))
    }

    fn track_options(
        &self,
        meta: &mut Meta,
        target: &TargetId,
        options: TrackOptions,
    ) -> Result<()> {
        if self.inner.config.validate_tag_names {
            options.validate()?;
        }
        self.activate(meta, target, &options.tags)
    }

    /// Register `tags` for `target` and make sure it carries the interceptor.
    pub(crate) fn activate(
        &self,
        meta: &mut Meta,
        target: &TargetId,
        tags: &[TagName],
    ) -> Result<()> {
        meta.kind_of(target)?;
        if self.inner.registry.register(target, tags) {
            meta.install_hook(target, Arc::new(AttributeInterceptor::new(self.clone())))?;
            debug!(%target, "installed attribute interceptor");
        }
        Ok(())
    }

    /// Make sure a role holding records passes them on when it is applied,
    /// without letting it declare tagged attributes.
    ///
    /// Tracking targets already do this, and classes are never applied.
    pub(crate) fn carry(&self, meta: &mut Meta, target: &TargetId) -> Result<()> {
        if meta.kind_of(target)? != TargetKind::Role || self.is_tracking(target) {
            return Ok(());
        }
        let added = self
            .inner
            .carriers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.clone());
        if added {
            meta.install_hook(target, Arc::new(ChainCarrier::new(self.clone())))?;
            debug!(%target, "installed chain carrier");
        }
        Ok(())
    }

    /// Whether `target` can declare tagged attributes of its own.
    pub fn is_tracking(&self, target: &TargetId) -> bool {
        self.inner.registry.contains(target)
    }

    pub fn recognized_tags(&self, target: &TargetId) -> Vec<TagName> {
        self.inner.registry.lookup(target)
    }

    /// Every record visible from `target`, most specific first.
    pub fn tag_list(&self, meta: &Meta, target: &TargetId) -> Result<Vec<TagRecord>> {
        meta.kind_of(target)?;
        Ok(self.inner.chains.tag_list(meta, target))
    }

    /// The memoized cache for `class`, built on first access.
    pub fn tags_for_class(&self, meta: &Meta, class: &TargetId) -> Result<Arc<TagCache>> {
        if meta.kind_of(class)? != TargetKind::Class {
            return Err(AttrTagsError::NotAClass(class.clone()));
        }
        Ok(self.inner.caches.get_or_build(class, || {
            TagCache::build(class, &self.inner.chains.levels(meta, class))
        }))
    }

    /// Same object as [`tags_for_class`](Self::tags_for_class) on the instance's class.
    pub fn tags_for_instance(&self, meta: &Meta, instance: &Instance) -> Result<Arc<TagCache>> {
        self.tags_for_class(meta, instance.class())
    }

    /// The by-tag index as a nested map, for callers expecting
    /// `tags["tag"]["attribute"]` access.
    pub fn tags_nested(
        &self,
        meta: &Meta,
        class: &TargetId,
    ) -> Result<LockedMap<TagName, LockedMap<AttributeName, TagValue>>> {
        Ok(self.tags_for_class(meta, class)?.as_nested().clone())
    }

    pub fn is_cached(&self, class: &TargetId) -> bool {
        self.inner.caches.get(class).is_some()
    }
}
