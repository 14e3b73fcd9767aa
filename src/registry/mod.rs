// ABOUTME: Read-only registry of deployment targets and their services.
// ABOUTME: Resolves a target identifier into a fully resolved DeploymentTarget.

mod service;
mod target;

pub use service::{ServiceDescriptor, SourceRepo};
pub use target::{Credentials, DeploymentTarget};

use std::path::PathBuf;

use crate::config::{Config, TargetConfig};
use crate::error::{Error, Result};
use crate::types::TargetName;

/// All deployment targets known to this project.
#[derive(Debug, Clone)]
pub struct Registry {
    config: Config,
}

impl Registry {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Target keys with their display titles.
    pub fn targets(&self) -> impl Iterator<Item = (&TargetName, &str)> {
        self.config.targets.iter().map(|(name, target)| {
            let title = target.title.as_deref().unwrap_or(name.as_str());
            (name, title)
        })
    }

    /// Resolve a target identifier (key or display title) for one run.
    ///
    /// Credentials are read from the environment here, so only the chosen
    /// target's variables need to be set.
    pub fn resolve(&self, id: &str) -> Result<DeploymentTarget> {
        let (name, entry) = self.entry(id)?;
        DeploymentTarget::from_config(name, entry)
    }

    /// A target's services in configuration order, without resolving credentials.
    pub fn services(&self, id: &str) -> Result<Vec<ServiceDescriptor>> {
        let (_, entry) = self.entry(id)?;
        entry
            .unique_services()
            .into_iter()
            .map(ServiceDescriptor::from_config)
            .collect()
    }

    /// Folder for a target's services, relative to the working directory.
    pub fn target_dir(&self, target: &DeploymentTarget) -> PathBuf {
        self.config.deployment_root.join(target.name().as_str())
    }

    fn entry(&self, id: &str) -> Result<(TargetName, &TargetConfig)> {
        let unknown = || Error::UnknownTarget(id.to_string());
        let wanted = TargetName::new(id).map_err(|_| unknown())?;

        if let Some(entry) = self.config.targets.get(&wanted) {
            return Ok((wanted, entry));
        }

        // Fall back to matching display titles.
        self.config
            .targets
            .iter()
            .find(|(_, target)| {
                target
                    .title
                    .as_deref()
                    .and_then(|title| TargetName::new(title).ok())
                    .is_some_and(|title| title == wanted)
            })
            .map(|(name, target)| (name.clone(), target))
            .ok_or_else(unknown)
    }
}
