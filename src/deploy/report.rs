// ABOUTME: Per-service results and warnings collected over a run.
// ABOUTME: Tracks which services were abandoned so later phases skip them.

use serde::Serialize;

use crate::diagnostics::{Diagnostics, Warning};
use crate::pipeline::{Stage, StageError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServiceStatus {
    Pending,
    Deployed,
    Failed { stage: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub title: String,
    #[serde(flatten)]
    pub status: ServiceStatus,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub target: String,
    pub version: String,
    pub services: Vec<ServiceReport>,
    pub warnings: Diagnostics,
}

impl RunReport {
    pub fn new<'a>(
        target: &str,
        version: &str,
        titles: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            target: target.to_string(),
            version: version.to_string(),
            services: titles
                .into_iter()
                .map(|title| ServiceReport {
                    title: title.to_string(),
                    status: ServiceStatus::Pending,
                })
                .collect(),
            warnings: Diagnostics::default(),
        }
    }

    pub fn status(&self, title: &str) -> Option<&ServiceStatus> {
        self.entry(title).map(|s| &s.status)
    }

    pub fn is_abandoned(&self, title: &str) -> bool {
        matches!(self.status(title), Some(ServiceStatus::Failed { .. }))
    }

    pub fn deployed(&self) -> impl Iterator<Item = &str> {
        self.services
            .iter()
            .filter(|s| s.status == ServiceStatus::Deployed)
            .map(|s| s.title.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ServiceReport> {
        self.services
            .iter()
            .filter(|s| matches!(s.status, ServiceStatus::Failed { .. }))
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.warnings
    }

    pub(crate) fn abandon(&mut self, title: &str, stage: Stage, error: &StageError) {
        tracing::error!("{}: {} failed, skipping service: {}", title, stage, error);
        self.set_status(
            title,
            ServiceStatus::Failed {
                stage: stage.to_string(),
                error: error.to_string(),
            },
        );
    }

    pub(crate) fn mark_deployed(&mut self, title: &str) {
        self.set_status(title, ServiceStatus::Deployed);
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        self.warnings.warn(warning);
    }

    fn entry(&self, title: &str) -> Option<&ServiceReport> {
        self.services.iter().find(|s| s.title == title)
    }

    fn set_status(&mut self, title: &str, status: ServiceStatus) {
        if let Some(entry) = self.services.iter_mut().find(|s| s.title == title) {
            entry.status = status;
        }
    }
}
