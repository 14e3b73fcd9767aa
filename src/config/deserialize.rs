// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles labels, versions, destinations and normalized target keys.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::TargetConfig;
use crate::types::{Destination, ImageLabel, ReleaseVersion, TargetName};

pub fn deserialize_image_label<'de, D>(deserializer: D) -> Result<ImageLabel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageLabel::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_destination<'de, D>(deserializer: D) -> Result<Destination, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Destination::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_version<'de, D>(deserializer: D) -> Result<ReleaseVersion, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = match VersionEntry::deserialize(deserializer)? {
        VersionEntry::Text(s) => s,
        VersionEntry::Number(n) => n.to_string(),
    };
    ReleaseVersion::new(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_targets<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<TargetName, TargetConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries: BTreeMap<String, TargetConfig> = BTreeMap::deserialize(deserializer)?;
    let mut targets = BTreeMap::new();

    for (key, target) in entries {
        let name = TargetName::new(&key).map_err(serde::de::Error::custom)?;
        if targets.insert(name.clone(), target).is_some() {
            return Err(serde::de::Error::custom(format!(
                "target {key:?} collides with another target named {name}"
            )));
        }
    }

    Ok(targets)
}

/// Versions are often written unquoted (`version: 3`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionEntry {
    Text(String),
    Number(u64),
}
