// ABOUTME: Diagnostics accumulator for tolerated failures during a run.
// ABOUTME: Each warning names the service it concerns so the run report can group them.

use serde::Serialize;

/// Tolerated failures recorded over a run, in the order they happened.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning and log it.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}: {}", warning.service, warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Warnings recorded for one service.
    pub fn for_service<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a Warning> {
        self.warnings.iter().filter(move |w| w.service == service)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// Title of the service the failure belongs to.
    pub service: String,
    pub message: String,
}

impl Warning {
    /// `kubectl delete` of the running workload failed.
    pub fn previous_workload(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PreviousWorkload,
            service: service.into(),
            message: message.into(),
        }
    }

    /// A load balancer or node port manifest could not be applied.
    pub fn exposure(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Exposure,
            service: service.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Usually means no workload was running yet.
    PreviousWorkload,
    Exposure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn groups_warnings_by_service() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::previous_workload("API", "deployments \"api\" not found"));
        diag.warn(Warning::exposure("Web", "service type invalid"));
        diag.warn(Warning::exposure("API", "port already allocated"));

        assert_eq!(diag.warnings().len(), 3);
        let kinds: Vec<WarningKind> = diag.for_service("API").map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::PreviousWorkload, WarningKind::Exposure]);
    }

    #[test]
    fn serializes_as_a_list() {
        let mut diag = Diagnostics::default();
        diag.warn(Warning::exposure("Web", "boom"));

        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "kind": "exposure", "service": "Web", "message": "boom" }])
        );
    }
}
