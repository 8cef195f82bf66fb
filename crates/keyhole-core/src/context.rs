use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A context tag (game version) namespacing a set of access codes.
///
/// Tags are 1-64 characters of `[A-Za-z0-9._-]`. Requests that carry no tag
/// resolve against [`ContextTag::DEFAULT`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextTag(String);

const MAX_LENGTH: usize = 64;

impl ContextTag {
    pub const DEFAULT: &'static str = "default";

    /// Creates a new `ContextTag` after validating the input.
    pub fn new(tag: impl Into<String>) -> Result<Self, CoreError> {
        let tag = tag.into();
        Self::validate(&tag)?;
        Ok(Self(tag))
    }

    /// Resolves an optional, possibly blank tag from a request.
    ///
    /// `None` and blank strings map to the default context.
    pub fn from_request(tag: Option<&str>) -> Result<Self, CoreError> {
        match tag.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(tag) => Self::new(tag),
        }
    }

    /// Creates a `ContextTag` without validation.
    pub fn new_unchecked(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(tag: &str) -> Result<(), CoreError> {
        if tag.is_empty() || tag.len() > MAX_LENGTH {
            return Err(CoreError::InvalidContextTag(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                tag.len()
            )));
        }

        if !tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(CoreError::InvalidContextTag(format!(
                "must contain only alphanumeric characters, dots, hyphens, or underscores: '{}'",
                tag
            )));
        }

        Ok(())
    }
}

impl Default for ContextTag {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContextTag {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContextTag> for String {
    fn from(value: ContextTag) -> Self {
        value.0
    }
}
