//! Options of the tag tracking directive.
//!
//! The directive accepts a single key:
//!
//! | Key | Shape | Meaning |
//! |-----|-------|---------|
//! | `tags` | string or list of strings | Tag names recognized from now on |
//!
//! Any other key is a definition-time error.

use super::validation::validate_tag_name;
use super::TagName;
use crate::error::ConfigError;
use serde_json::Value;

const TAGS_KEY: &str = "tags";

/// Parsed directive options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOptions {
    pub tags: Vec<TagName>,
}

impl TrackOptions {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TagName>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `{"tags": "t"}` or `{"tags": ["t1", "t2"]}`.
    ///
    /// A missing `tags` key is allowed and means "no tags yet".
    ///
    /// ```
    /// use attrtags::tags::TrackOptions;
    /// use serde_json::json;
    ///
    /// let opts = TrackOptions::from_value(&json!({"tags": ["t1", "t2"]})).unwrap();
    /// assert_eq!(opts.tags, vec!["t1", "t2"]);
    ///
    /// let single = TrackOptions::from_value(&json!({"tags": "t1"})).unwrap();
    /// assert_eq!(single.tags, vec!["t1"]);
    ///
    /// assert!(TrackOptions::from_value(&json!({"tag": "t1"})).is_err());
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let map = value
            .as_object()
            .ok_or_else(|| ConfigError::NotAMap(value.to_string()))?;

        if let Some(unknown) = map.keys().find(|k| k.as_str() != TAGS_KEY) {
            return Err(ConfigError::UnknownOption(unknown.clone()));
        }

        let tags = match map.get(TAGS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(tag)) => vec![tag.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or(ConfigError::MalformedTags)?,
            Some(_) => return Err(ConfigError::MalformedTags),
        };
        Ok(Self { tags })
    }

    /// Apply the identifier rules to every tag name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in &self.tags {
            validate_tag_name(name).map_err(|reason| ConfigError::InvalidTagName {
                name: name.clone(),
                reason,
            })?;
        }
        Ok(())
    }
}
