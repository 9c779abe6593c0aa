//! Optional tag name validation.
//!
//! Tag names double as attribute declaration option keys, so a strict
//! deployment may want them to look like identifiers:
//! - ASCII alphanumerics, underscores (`_`), and hyphens (`-`)
//! - Must start with a letter
//! - No consecutive hyphens (`--`), no trailing hyphen

use thiserror::Error;

/// Check a tag name against the identifier rules.
///
/// # Examples
/// ```
/// use attrtags::tags::validation::validate_tag_name;
///
/// assert!(validate_tag_name("tag1").is_ok());
/// assert!(validate_tag_name("doc-string").is_ok());
/// assert!(validate_tag_name("db_column").is_ok());
///
/// assert!(validate_tag_name("").is_err());
/// assert!(validate_tag_name("1tag").is_err());
/// assert!(validate_tag_name("tag-").is_err());
/// assert!(validate_tag_name("tag--x").is_err());
/// ```
pub fn validate_tag_name(name: &str) -> Result<(), TagValidationError> {
    let first = name.chars().next().ok_or(TagValidationError::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(TagValidationError::InvalidStart(first));
    }
    if let Some(bad) = name
        .chars()
        .find(|&ch| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
    {
        return Err(TagValidationError::InvalidCharacter(bad));
    }
    if name.contains("--") {
        return Err(TagValidationError::ConsecutiveHyphens);
    }
    if name.ends_with('-') {
        return Err(TagValidationError::EndsWithHyphen);
    }
    Ok(())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    #[error("tag name cannot be empty")]
    Empty,

    #[error("tag name must start with a letter, found '{0}'")]
    InvalidStart(char),

    #[error("tag name contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("tag name cannot contain consecutive hyphens")]
    ConsecutiveHyphens,

    #[error("tag name cannot end with a hyphen")]
    EndsWithHyphen,
}
