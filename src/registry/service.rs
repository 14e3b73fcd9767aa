// ABOUTME: Static description of one deployable service.
// ABOUTME: Derives the clone folder deterministically from the source URL.

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::types::ImageLabel;

/// Git repository a service is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepo {
    url: String,
    clone_folder: String,
}

impl SourceRepo {
    pub fn new(url: &str) -> Result<Self> {
        let url = url.trim();
        let clone_folder = clone_folder_for(url).ok_or_else(|| {
            Error::InvalidConfig(format!("cannot derive a clone folder from git url {url:?}"))
        })?;

        Ok(Self {
            url: url.to_string(),
            clone_folder,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Folder name `git clone` creates for this repository.
    pub fn clone_folder(&self) -> &str {
        &self.clone_folder
    }
}

// Same rule git uses: last path component, minus a trailing `.git`.
fn clone_folder_for(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(|c: char| c == '/' || c == ':').next()?;
    let folder = last.strip_suffix(".git").unwrap_or(last);

    if folder.is_empty() || folder == "." || folder == ".." || folder.starts_with('-') {
        return None;
    }

    Some(folder.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    title: String,
    folder: String,
    source: Option<SourceRepo>,
    label: ImageLabel,
}

impl ServiceDescriptor {
    pub fn new(
        title: impl Into<String>,
        folder: impl Into<String>,
        source: Option<SourceRepo>,
        label: ImageLabel,
    ) -> Self {
        Self {
            title: title.into(),
            folder: folder.into(),
            source,
            label,
        }
    }

    pub(crate) fn from_config(config: &ServiceConfig) -> Result<Self> {
        let source = config.git.as_deref().map(SourceRepo::new).transpose()?;
        Ok(Self::new(
            config.title.clone(),
            config.folder.clone(),
            source,
            config.label.clone(),
        ))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn source(&self) -> Option<&SourceRepo> {
        self.source.as_ref()
    }

    pub fn label(&self) -> &ImageLabel {
        &self.label
    }
}
