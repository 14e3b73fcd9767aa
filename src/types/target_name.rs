// ABOUTME: Normalized deployment target identifier.
// ABOUTME: "Deployment target 1" and "deployment_target_1" name the same target.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetNameError {
    #[error("target name cannot be empty")]
    Empty,

    #[error("invalid character in target name: '{0}'")]
    InvalidChar(char),
}

/// Target key used for lookups and as the directory name under the deployment root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetName(String);

impl TargetName {
    pub fn new(value: &str) -> Result<Self, TargetNameError> {
        let normalized = value
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();

        if normalized.is_empty() {
            return Err(TargetNameError::Empty);
        }

        for c in normalized.chars() {
            if !c.is_alphanumeric() && c != '_' && c != '-' {
                return Err(TargetNameError::InvalidChar(c));
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
