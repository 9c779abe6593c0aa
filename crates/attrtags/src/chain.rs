//! # Chain Accumulator
//!
//! Reconstructs every [`TagRecord`] visible from a class or role.
//!
//! Each target owns an ordered list of [`Contributor`]s, appended to as the
//! target is defined:
//!
//! - `Declared`: the records of one attribute declaration on the target.
//! - `Composed`: a tag tracking role applied via the propagating path. Its
//!   chain is read live whenever this target's chain is walked.
//! - `Baked`: a snapshot of a role's chain taken when it was applied via the
//!   copy-only path.
//!
//! ## Walk Order
//!
//! A walk produces [`ChainLevel`]s, most specific first:
//!
//! ```text
//! target's own declarations (insertion order)
//!   -> each Composed / Baked contributor, in application order (recursively)
//!   -> the parent class's chain
//! ```
//!
//! A target reached twice (diamond composition, or a role applied at two
//! inheritance levels) only contributes at its first, most specific position.
//! No ordering is promised between sibling compositions beyond that.

use crate::meta::{Meta, TargetId};
use crate::tags::TagRecord;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Contributor {
    Declared(Vec<TagRecord>),
    Composed(TargetId),
    Baked {
        origin: TargetId,
        levels: Vec<ChainLevel>,
    },
}

/// Records a single target contributes directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLevel {
    pub origin: TargetId,
    pub records: Vec<TagRecord>,
}

/// Contributor lists for every tag tracking target.
#[derive(Debug, Default)]
pub struct ChainStore {
    contributors: RwLock<HashMap<TargetId, Vec<Contributor>>>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, target: &TargetId, contributor: Contributor) {
        debug!(%target, kind = contributor.kind(), "appending chain contributor");
        self.contributors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target.clone())
            .or_default()
            .push(contributor);
    }

    /// Snapshot of the contributors installed on `target`.
    pub fn contributors(&self, target: &TargetId) -> Vec<Contributor> {
        self.contributors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()
            .unwrap_or_default()
    }

    /// Walk the composition and inheritance graph from `target`.
    pub fn levels(&self, meta: &Meta, target: &TargetId) -> Vec<ChainLevel> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.walk(meta, target, &mut seen, &mut out);
        out
    }

    /// The flattened chain: every visible record, most specific first.
    ///
    /// Empty when nothing in the graph ever asked for tag tracking.
    pub fn tag_list(&self, meta: &Meta, target: &TargetId) -> Vec<TagRecord> {
        self.levels(meta, target)
            .into_iter()
            .flat_map(|level| level.records)
            .collect()
    }

    fn walk(
        &self,
        meta: &Meta,
        target: &TargetId,
        seen: &mut HashSet<TargetId>,
        out: &mut Vec<ChainLevel>,
    ) {
        if !seen.insert(target.clone()) {
            return;
        }
        let contributors = self.contributors(target);

        let own: Vec<TagRecord> = contributors
            .iter()
            .filter_map(|c| match c {
                Contributor::Declared(records) => Some(records.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect();
        if !own.is_empty() {
            out.push(ChainLevel {
                origin: target.clone(),
                records: own,
            });
        }

        for contributor in contributors {
            match contributor {
                Contributor::Declared(_) => {}
                Contributor::Composed(role) => self.walk(meta, &role, seen, out),
                Contributor::Baked { levels, .. } => {
                    for level in levels {
                        if seen.insert(level.origin.clone()) {
                            out.push(level);
                        }
                    }
                }
            }
        }

        if let Some(parent) = meta.parent_of(target) {
            self.walk(meta, parent, seen, out);
        }
    }
}

impl Contributor {
    fn kind(&self) -> &'static str {
        match self {
            Contributor::Declared(_) => "declared",
            Contributor::Composed(_) => "composed",
            Contributor::Baked { .. } => "baked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Application;

    fn level(origin: &str, records: Vec<TagRecord>) -> ChainLevel {
        ChainLevel {
            origin: TargetId::from(origin),
            records,
        }
    }

    #[test]
    fn test_untracked_target_has_empty_chain() {
        let mut meta = Meta::new();
        let class = meta.define_class("C").unwrap();
        let store = ChainStore::new();
        assert!(store.tag_list(&meta, &class).is_empty());
    }

    #[test]
    fn test_declarations_form_one_level_in_insertion_order() {
        let mut meta = Meta::new();
        let class = meta.define_class("C").unwrap();
        let store = ChainStore::new();
        store.append(
            &class,
            Contributor::Declared(vec![TagRecord::new("t", ["a"], 1)]),
        );
        store.append(
            &class,
            Contributor::Declared(vec![TagRecord::new("t", ["b"], 2)]),
        );

        assert_eq!(
            store.levels(&meta, &class),
            vec![level(
                "C",
                vec![TagRecord::new("t", ["a"], 1), TagRecord::new("t", ["b"], 2)]
            )]
        );
    }

    #[test]
    fn test_own_then_composed_then_parent() {
        let mut meta = Meta::new();
        let role = meta.define_role("R").unwrap();
        let parent = meta.define_class("P").unwrap();
        let child = meta.define_class("C").unwrap();
        meta.extends(&child, &parent).unwrap();
        meta.apply_role(&role, &child, Application::Propagating)
            .unwrap();

        let store = ChainStore::new();
        store.append(
            &parent,
            Contributor::Declared(vec![TagRecord::new("t", ["p"], "p")]),
        );
        store.append(
            &role,
            Contributor::Declared(vec![TagRecord::new("t", ["r"], "r")]),
        );
        store.append(&child, Contributor::Composed(role.clone()));
        store.append(
            &child,
            Contributor::Declared(vec![TagRecord::new("t", ["c"], "c")]),
        );

        let origins: Vec<_> = store
            .levels(&meta, &child)
            .into_iter()
            .map(|l| l.origin.to_string())
            .collect();
        assert_eq!(origins, vec!["C", "R", "P"]);
    }

    #[test]
    fn test_shared_role_contributes_once() {
        let meta = Meta::new();
        let store = ChainStore::new();
        let base = TargetId::from("T");
        let left = TargetId::from("R1");
        let right = TargetId::from("R2");
        let top = TargetId::from("C");

        store.append(
            &base,
            Contributor::Declared(vec![TagRecord::new("t", ["shared"], 0)]),
        );
        store.append(&left, Contributor::Composed(base.clone()));
        store.append(&right, Contributor::Composed(base.clone()));
        store.append(&top, Contributor::Composed(left));
        store.append(&top, Contributor::Composed(right));

        assert_eq!(
            store.tag_list(&meta, &top),
            vec![TagRecord::new("t", ["shared"], 0)]
        );
    }

    #[test]
    fn test_baked_levels_are_frozen() {
        let meta = Meta::new();
        let store = ChainStore::new();
        let role = TargetId::from("R");
        let class = TargetId::from("C");

        store.append(
            &role,
            Contributor::Declared(vec![TagRecord::new("t", ["r1"], 1)]),
        );
        store.append(
            &class,
            Contributor::Baked {
                origin: role.clone(),
                levels: store.levels(&meta, &role),
            },
        );
        store.append(
            &role,
            Contributor::Declared(vec![TagRecord::new("t", ["r2"], 2)]),
        );

        assert_eq!(
            store.tag_list(&meta, &class),
            vec![TagRecord::new("t", ["r1"], 1)]
        );
        assert_eq!(store.tag_list(&meta, &role).len(), 2);
    }
}
