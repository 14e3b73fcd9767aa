// ABOUTME: Published image reference for one service in one release.
// ABOUTME: Renders as `{destination}/{label}:v{version}`.

use std::fmt;

use super::{Destination, ImageLabel, ReleaseVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    destination: Destination,
    label: ImageLabel,
    version: ReleaseVersion,
}

impl ImageRef {
    pub fn new(destination: Destination, label: ImageLabel, version: ReleaseVersion) -> Self {
        Self {
            destination,
            label,
            version,
        }
    }

    /// Tag applied by the local build before the image is re-tagged for the registry.
    pub fn local_tag(&self) -> String {
        format!("{}:{}", self.label, self.version.tag())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}",
            self.destination,
            self.label,
            self.version.tag()
        )
    }
}
