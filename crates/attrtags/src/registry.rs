//! Tag registry: which tag names each target recognizes.
//!
//! Entries only ever grow. Registering a target again appends the new names
//! after the existing ones, duplicates included.

use crate::meta::TargetId;
use crate::tags::TagName;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Per-target recognized tag names.
///
/// Written while classes and roles are being defined, read on every
/// attribute declaration. Guarded by an `RwLock` so a [`TagService`]
/// can be shared across threads.
///
/// [`TagService`]: crate::service::TagService
#[derive(Debug, Default)]
pub struct TagRegistry {
    entries: RwLock<HashMap<TargetId, Vec<TagName>>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `tags` to the target's entry, creating it if needed.
    ///
    /// Returns `true` when the entry was created by this call. Callers use
    /// that to do first-time setup exactly once.
    pub fn register(&self, target: &TargetId, tags: &[TagName]) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(target) {
            Some(existing) => {
                existing.extend_from_slice(tags);
                debug!(%target, added = ?tags, "extended tag registration");
                false
            }
            None => {
                entries.insert(target.clone(), tags.to_vec());
                debug!(%target, ?tags, "registered target for tag tracking");
                true
            }
        }
    }

    /// Recognized tag names for `target`; empty if it never registered.
    pub fn lookup(&self, target: &TargetId) -> Vec<TagName> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, target: &TargetId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tags: &[&str]) -> Vec<TagName> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_first_registration_reports_new() {
        let registry = TagRegistry::new();
        let t1 = TargetId::from("T1");
        assert!(registry.register(&t1, &names(&["tag1"])));
        assert!(!registry.register(&t1, &names(&["tag2"])));
    }

    #[test]
    fn test_registration_is_additive() {
        let registry = TagRegistry::new();
        let t1 = TargetId::from("T1");
        registry.register(&t1, &names(&["tag1", "tag2"]));
        registry.register(&t1, &names(&["tag2", "tag3"]));
        assert_eq!(
            registry.lookup(&t1),
            names(&["tag1", "tag2", "tag2", "tag3"])
        );
    }

    #[test]
    fn test_lookup_unknown_is_empty() {
        let registry = TagRegistry::new();
        let ghost = TargetId::from("Ghost");
        assert!(registry.lookup(&ghost).is_empty());
        assert!(!registry.contains(&ghost));
    }

    #[test]
    fn test_empty_registration_still_creates_entry() {
        let registry = TagRegistry::new();
        let t = TargetId::from("T");
        assert!(registry.register(&t, &[]));
        assert!(registry.contains(&t));
    }
}
