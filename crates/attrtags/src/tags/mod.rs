//! Tag vocabulary.
//!
//! A tag is a named category of per-attribute metadata. A target opts into
//! tracking a set of tag names; from then on every attribute it declares
//! with one of those names as a declaration option produces a [`TagRecord`]
//! carrying the option's value.
//!
//! ## Tag Naming Rules
//!
//! Tag names are opaque strings. When
//! [`ServiceConfig::validate_tag_names`](crate::config::ServiceConfig) is on,
//! they must follow the identifier rules in [`validation`].

pub mod options;
pub mod validation;

use crate::meta::{AttributeDecl, AttributeName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

pub use options::TrackOptions;
pub use validation::{validate_tag_name, TagValidationError};

/// Name of a tag category, e.g. `"tag1"`.
pub type TagName = String;

/// Arbitrary value attached to an attribute under a tag.
pub type TagValue = serde_json::Value;

/// One tag applied to one declaration.
///
/// `attributes` holds more than one name when several attributes were
/// declared together with shared options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub tag: TagName,
    pub attributes: BTreeSet<AttributeName>,
    pub value: TagValue,
}

impl TagRecord {
    pub fn new<I, S>(tag: impl Into<TagName>, attributes: I, value: impl Into<TagValue>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AttributeName>,
    {
        Self {
            tag: tag.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            value: value.into(),
        }
    }
}

/// Records produced by `decl` for the given recognized tags.
///
/// Options that are not recognized tags are ignored. A tag listed twice in
/// `recognized` still yields a single record.
pub fn records_for(recognized: &[TagName], decl: &AttributeDecl) -> Vec<TagRecord> {
    let mut seen = HashSet::new();
    recognized
        .iter()
        .filter(|tag| seen.insert(tag.as_str()))
        .filter_map(|tag| {
            decl.options().get(tag).map(|value| TagRecord {
                tag: tag.clone(),
                attributes: decl.names().clone(),
                value: value.clone(),
            })
        })
        .collect()
}
