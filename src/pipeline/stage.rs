// ABOUTME: Stage identities, failure policy, and stage outcomes.
// ABOUTME: The policy table decides whether a failure aborts the run, one service, or nothing.

use std::fmt;

use super::StageError;
use crate::manifest::ExposureKind;

/// One step of the deployment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Log in to the image registry for the run.
    Authenticate,
    /// Point kubectl at the target cluster.
    ConfigureClusterAccess,
    /// Fresh clone of the service's source repository.
    CloneSource,
    /// Build, tag and push the service image.
    BuildTagPush,
    /// Registry login repeated before a service's rollout.
    Reauthenticate,
    /// Delete the workload currently running for the service.
    RemoveExistingWorkload,
    /// Rewrite the manifest image and apply it.
    PatchAndApplyWorkload,
    /// Apply a load-balancer or node-port manifest.
    ApplyExposure(ExposureKind),
}

/// What a stage failure means for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    AbortRun,
    AbandonService,
    Tolerate,
}

impl Stage {
    pub fn policy(&self) -> FailurePolicy {
        match self {
            Stage::Authenticate | Stage::ConfigureClusterAccess => FailurePolicy::AbortRun,
            Stage::CloneSource
            | Stage::BuildTagPush
            | Stage::Reauthenticate
            | Stage::PatchAndApplyWorkload => FailurePolicy::AbandonService,
            // A missing previous workload is the normal first-deploy case.
            Stage::RemoveExistingWorkload | Stage::ApplyExposure(_) => FailurePolicy::Tolerate,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Authenticate => write!(f, "registry login"),
            Stage::ConfigureClusterAccess => write!(f, "cluster access"),
            Stage::CloneSource => write!(f, "git clone"),
            Stage::BuildTagPush => write!(f, "image build"),
            Stage::Reauthenticate => write!(f, "registry re-login"),
            Stage::RemoveExistingWorkload => write!(f, "workload removal"),
            Stage::PatchAndApplyWorkload => write!(f, "workload apply"),
            Stage::ApplyExposure(kind) => write!(f, "{kind} apply"),
        }
    }
}

/// Successful result of a stage body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Applied,
    Skipped(String),
}

/// Result of one stage invocation, as seen by the orchestrator.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    /// Precondition not met; nothing was attempted.
    Skipped(String),
    /// Failed, but the stage's policy lets processing continue.
    Tolerated(StageError),
    /// Failed; the current service is abandoned.
    Abandoned(StageError),
    /// Failed; the whole run stops.
    Aborted(StageError),
}

impl Outcome {
    /// Apply the stage's failure policy to a stage result.
    pub fn settle(stage: Stage, result: Result<Effect, StageError>) -> Self {
        match result {
            Ok(Effect::Applied) => Outcome::Completed,
            Ok(Effect::Skipped(reason)) => Outcome::Skipped(reason),
            Err(e) => match stage.policy() {
                FailurePolicy::AbortRun => Outcome::Aborted(e),
                FailurePolicy::AbandonService => Outcome::Abandoned(e),
                FailurePolicy::Tolerate => Outcome::Tolerated(e),
            },
        }
    }

    /// Whether later stages for the same service may run.
    pub fn allows_continue(&self) -> bool {
        !matches!(self, Outcome::Abandoned(_) | Outcome::Aborted(_))
    }
}
