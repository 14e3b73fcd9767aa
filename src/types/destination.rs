// ABOUTME: Image destination prefix, e.g. a registry host plus optional namespace.
// ABOUTME: Validated so that `{prefix}/{label}:{tag}` is always a well-formed reference.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("image destination cannot be empty")]
    Empty,

    #[error("invalid character in image destination: {0}")]
    InvalidChar(char),

    #[error("invalid image destination format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination(String);

impl Destination {
    pub fn new(input: &str) -> Result<Self, DestinationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DestinationError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric()
                && c != '/'
                && c != ':'
                && c != '.'
                && c != '-'
                && c != '_'
            {
                return Err(DestinationError::InvalidChar(c));
            }
        }

        if input.starts_with(&['-', '/', '.', ':'][..]) || input.ends_with('/') {
            return Err(DestinationError::InvalidFormat(input.to_string()));
        }

        if input.split('/').any(str::is_empty) {
            return Err(DestinationError::InvalidFormat(input.to_string()));
        }

        // A colon is only allowed as a registry port, never as a tag.
        if let Some((_, path)) = input.split_once('/')
            && path.contains(':')
        {
            return Err(DestinationError::InvalidFormat(input.to_string()));
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry host the login token is issued for.
    pub fn registry_host(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
