// ABOUTME: One resolved deployment target: cluster, registry, version and services.
// ABOUTME: Immutable for the duration of a run and passed explicitly to every stage.

use std::collections::HashSet;
use std::fmt;

use crate::config::TargetConfig;
use crate::error::{Error, Result};
use crate::types::{Destination, ImageRef, ReleaseVersion, TargetName};

use super::ServiceDescriptor;

/// Registry access keys, handed to the cloud CLI through its environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn to_env(&self) -> Vec<(String, String)> {
        vec![
            ("AWS_ACCESS_KEY_ID".to_string(), self.access_key_id.clone()),
            (
                "AWS_SECRET_ACCESS_KEY".to_string(),
                self.secret_access_key.clone(),
            ),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    name: TargetName,
    title: String,
    region: String,
    cluster: String,
    destination: Destination,
    version: ReleaseVersion,
    platform: String,
    reauthenticate: bool,
    credentials: Option<Credentials>,
    services: Vec<ServiceDescriptor>,
}

impl DeploymentTarget {
    pub(crate) fn from_config(name: TargetName, config: &TargetConfig) -> Result<Self> {
        let credentials = match config.credentials {
            Some(ref creds) => Some(Credentials {
                access_key_id: creds.access_key_id.resolve()?,
                secret_access_key: creds.secret_access_key.resolve()?,
            }),
            None => None,
        };

        let services = config
            .unique_services()
            .into_iter()
            .map(ServiceDescriptor::from_config)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| name.as_str().to_string()),
            name,
            region: config.region.clone(),
            cluster: config.cluster.clone(),
            destination: config.destination.clone(),
            version: config.version.clone(),
            platform: config.platform.clone(),
            reauthenticate: config.reauthenticate,
            credentials,
            services,
        })
    }

    pub fn name(&self) -> &TargetName {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn reauthenticate(&self) -> bool {
        self.reauthenticate
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Services in configuration order.
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Services sorted by title, for listing and selection prompts.
    pub fn services_by_title(&self) -> Vec<&ServiceDescriptor> {
        let mut services: Vec<_> = self.services.iter().collect();
        services.sort_by(|a, b| a.title().cmp(b.title()));
        services
    }

    pub fn service(&self, title: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.title() == title)
    }

    /// Look up selected services, keeping selection order.
    pub fn select<S: AsRef<str>>(&self, titles: &[S]) -> Result<Vec<&ServiceDescriptor>> {
        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for title in titles {
            let title = title.as_ref();
            if !seen.insert(title) {
                continue;
            }
            let service = self.service(title).ok_or_else(|| Error::UnknownService {
                target: self.name.to_string(),
                service: title.to_string(),
            })?;
            selected.push(service);
        }

        Ok(selected)
    }

    /// Reference the service's image is published under in this release.
    pub fn image_ref(&self, service: &ServiceDescriptor) -> ImageRef {
        ImageRef::new(
            self.destination.clone(),
            service.label().clone(),
            self.version.clone(),
        )
    }
}
