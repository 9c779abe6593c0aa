use thiserror::Error;

use crate::meta::TargetId;
use crate::tags::validation::TagValidationError;

/// Problems with the options handed to the tag tracking directive.
///
/// These surface at definition time, before any registry state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown tag tracking option '{0}' (only 'tags' is recognized)")]
    UnknownOption(String),

    #[error("tag tracking options must be a map, got {0}")]
    NotAMap(String),

    #[error("option 'tags' must be a tag name or a list of tag names")]
    MalformedTags,

    #[error("invalid tag name '{name}': {reason}")]
    InvalidTagName {
        name: String,
        reason: TagValidationError,
    },
}

#[derive(Error, Debug)]
pub enum AttrTagsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown target: {0}")]
    UnknownTarget(TargetId),

    #[error("Target already defined: {0}")]
    DuplicateTarget(TargetId),

    #[error("{0} is not a class")]
    NotAClass(TargetId),

    #[error("{0} is not a role")]
    NotARole(TargetId),

    #[error("{child} already extends {parent}")]
    ParentAlreadySet { child: TargetId, parent: TargetId },

    #[error("{child} cannot extend {parent}: inheritance cycle")]
    InheritanceCycle { child: TargetId, parent: TargetId },

    #[error("applying {role} to {dest} would create a composition cycle")]
    CompositionCycle { role: TargetId, dest: TargetId },

    #[error("Structure is locked: cannot modify {structure}")]
    Locked { structure: String },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, AttrTagsError>;
