// ABOUTME: Release version shared by every image built in a run.
// ABOUTME: Rendered as a `v`-prefixed image tag.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseVersionError {
    #[error("release version cannot be empty")]
    Empty,

    #[error("release version exceeds maximum length of 127 characters")]
    TooLong,

    #[error("invalid character in release version: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn new(value: &str) -> Result<Self, ReleaseVersionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ReleaseVersionError::Empty);
        }

        // The tag adds a leading `v`; registries cap tags at 128 characters.
        if value.len() > 127 {
            return Err(ReleaseVersionError::TooLong);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '.' && c != '-' && c != '_' {
                return Err(ReleaseVersionError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Image tag for this version, e.g. `v3`.
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
