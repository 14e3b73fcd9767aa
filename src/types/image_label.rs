// ABOUTME: Container image label (repository name component) validation.
// ABOUTME: Restricts labels to lowercase characters accepted by image registries.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageLabelError {
    #[error("image label cannot be empty")]
    Empty,

    #[error("image label exceeds maximum length of 128 characters")]
    TooLong,

    #[error("image label must start with a lowercase letter or digit")]
    InvalidStart,

    #[error("image label must be lowercase")]
    NotLowercase,

    #[error("invalid character in image label: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageLabel(String);

impl ImageLabel {
    pub fn new(value: &str) -> Result<Self, ImageLabelError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ImageLabelError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(ImageLabelError::TooLong);
        }

        if !value.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ImageLabelError::InvalidStart);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ImageLabelError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '_' && c != '.'
            {
                return Err(ImageLabelError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
