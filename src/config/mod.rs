// ABOUTME: Configuration types and parsing for hephaestus.yml.
// ABOUTME: Handles YAML parsing, discovery, target-key normalization and validation.

mod deserialize;
mod env_value;
mod init;

pub use env_value::EnvValue;
pub use init::init_config;

use crate::error::{Error, Result};
use crate::types::{Destination, ImageLabel, ReleaseVersion, TargetName};
use deserialize::{
    deserialize_destination, deserialize_image_label, deserialize_targets, deserialize_version,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "hephaestus.yml";
pub const CONFIG_FILENAME_ALT: &str = "hephaestus.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".hephaestus/config.yml";

/// Build architecture used when a target does not name one.
pub const DEFAULT_PLATFORM: &str = "linux/amd64";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding `<target>/<folder>/` service folders.
    #[serde(default = "default_deployment_root")]
    pub deployment_root: PathBuf,

    #[serde(deserialize_with = "deserialize_targets")]
    pub targets: BTreeMap<TargetName, TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub title: Option<String>,

    pub region: String,

    pub cluster: String,

    #[serde(deserialize_with = "deserialize_destination")]
    pub destination: Destination,

    #[serde(deserialize_with = "deserialize_version")]
    pub version: ReleaseVersion,

    #[serde(default = "default_platform")]
    pub platform: String,

    /// Log in to the registry again before each service's rollout.
    #[serde(default = "default_reauthenticate")]
    pub reauthenticate: bool,

    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,

    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub access_key_id: EnvValue,
    pub secret_access_key: EnvValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    pub title: String,

    pub folder: String,

    #[serde(default)]
    pub git: Option<String>,

    #[serde(deserialize_with = "deserialize_image_label")]
    pub label: ImageLabel,
}

fn default_deployment_root() -> PathBuf {
    PathBuf::from("deployment")
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

fn default_reauthenticate() -> bool {
    true
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one target is required".to_string(),
            ));
        }

        for (name, target) in &self.targets {
            target.validate(name)?;
        }

        Ok(())
    }
}

impl TargetConfig {
    fn validate(&self, name: &TargetName) -> Result<()> {
        let invalid = |msg: String| Error::InvalidConfig(format!("target {name}: {msg}"));

        for (field, value) in [
            ("region", &self.region),
            ("cluster", &self.cluster),
            ("platform", &self.platform),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{field} cannot be empty")));
            }
            if value.starts_with('-') || value.chars().any(char::is_whitespace) {
                return Err(invalid(format!("invalid {field}: {value:?}")));
            }
        }

        let mut seen: Vec<&ServiceConfig> = Vec::new();
        for service in &self.services {
            service.validate().map_err(invalid)?;

            if seen.contains(&service) {
                continue;
            }
            if let Some(other) = seen
                .iter()
                .find(|s| s.title == service.title || s.label == service.label)
            {
                return Err(invalid(format!(
                    "services {:?} and {:?} share a title or label",
                    other.title, service.title
                )));
            }
            seen.push(service);
        }

        Ok(())
    }

    /// Services in configuration order with exact duplicates collapsed.
    pub fn unique_services(&self) -> Vec<&ServiceConfig> {
        let mut seen = HashSet::new();
        self.services
            .iter()
            .filter(|s| seen.insert(s.title.as_str()))
            .collect()
    }
}

impl ServiceConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("service title cannot be empty".to_string());
        }

        let folder = self.folder.as_str();
        if folder.is_empty()
            || folder == "."
            || folder == ".."
            || folder.starts_with('-')
            || folder.contains(&['/', '\\'][..])
        {
            return Err(format!(
                "service {:?}: folder must be a single directory name, got {:?}",
                self.title, self.folder
            ));
        }

        if let Some(ref git) = self.git
            && (git.trim().is_empty() || git.starts_with('-'))
        {
            return Err(format!(
                "service {:?}: invalid git url {:?}",
                self.title, git
            ));
        }

        Ok(())
    }
}
