//! # Configuration
//!
//! Service settings are managed by [`confique`], layered in priority order:
//! 1. **Environment variables**: `ATTRTAGS_VALIDATE_TAG_NAMES`.
//! 2. **Config file**: an optional TOML file passed to [`ServiceConfig::load`].
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `validate_tag_names` | `false` | Reject tag names that are not plain identifiers |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Require tag names given to the tracking directive to start with a
    /// letter and contain only alphanumerics, `_` and `-`.
    #[config(default = false, env = "ATTRTAGS_VALIDATE_TAG_NAMES")]
    pub validate_tag_names: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            validate_tag_names: false,
        }
    }
}

impl ServiceConfig {
    /// Load from the environment and, if given, a TOML file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn strict() -> Self {
        Self {
            validate_tag_names: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_is_lenient() {
        assert!(!ServiceConfig::default().validate_tag_names);
        assert!(ServiceConfig::strict().validate_tag_names);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attrtags.toml");
        fs::write(&path, "validate_tag_names = true\n").unwrap();

        let config = ServiceConfig::load(Some(&path)).unwrap();
        assert!(config.validate_tag_names);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = ServiceConfig::load(Some(&path)).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attrtags.toml");
        fs::write(&path, "validate_tag_names = \"sometimes\"\n").unwrap();
        assert!(ServiceConfig::load(Some(&path)).is_err());
    }
}
