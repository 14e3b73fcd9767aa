// ABOUTME: Immutable per-run context shared by all stages.
// ABOUTME: Carries the resolved target and maps services to their on-disk folders.

use std::path::PathBuf;

use crate::manifest::{ExposureKind, WORKLOAD_MANIFEST};
use crate::registry::{DeploymentTarget, ServiceDescriptor};

#[derive(Debug, Clone)]
pub struct DeployContext {
    target: DeploymentTarget,
    target_dir: PathBuf,
}

impl DeployContext {
    /// `target_dir` holds one folder per service.
    pub fn new(target: DeploymentTarget, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            target_dir: target_dir.into(),
        }
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    pub fn service_dir(&self, service: &ServiceDescriptor) -> PathBuf {
        self.target_dir.join(service.folder())
    }

    /// Folder the service's repository is cloned into, if it has one.
    pub fn clone_dir(&self, service: &ServiceDescriptor) -> Option<PathBuf> {
        service
            .source()
            .map(|repo| self.service_dir(service).join(repo.clone_folder()))
    }

    /// Directory to build from, and whether to build without cache.
    ///
    /// Services without a repository build from their own folder with caching
    /// disabled, so edited local files are always picked up.
    pub fn build_context(&self, service: &ServiceDescriptor) -> (PathBuf, bool) {
        match self.clone_dir(service) {
            Some(dir) => (dir, false),
            None => (self.service_dir(service), true),
        }
    }

    pub fn workload_manifest(&self, service: &ServiceDescriptor) -> PathBuf {
        self.service_dir(service).join(WORKLOAD_MANIFEST)
    }

    pub fn exposure_manifest(&self, service: &ServiceDescriptor, kind: ExposureKind) -> PathBuf {
        self.service_dir(service).join(kind.file_name())
    }
}
