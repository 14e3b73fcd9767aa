// ABOUTME: Sequential run over the selected services of one target.
// ABOUTME: Applies each stage's failure policy so one broken service never blocks the rest.

use crate::diagnostics::Warning;
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::manifest::ExposureKind;
use crate::output::Output;
use crate::pipeline::{DeployContext, Outcome, Pipeline, Stage};
use crate::registry::{Registry, ServiceDescriptor};

use super::{Checkpoint, RunPlan, RunReport};

pub const CHECKPOINT_PROMPT: &str = "Please update configs in cloned repos and confirm";

/// Drives a run: resolve, authenticate, clone, build and roll out, expose.
pub struct Orchestrator<'a, R: ?Sized, C: ?Sized> {
    registry: &'a Registry,
    runner: &'a R,
    checkpoint: &'a C,
    output: &'a Output,
}

impl<'a, R, C> Orchestrator<'a, R, C>
where
    R: CommandRunner + ?Sized,
    C: Checkpoint + ?Sized,
{
    pub fn new(registry: &'a Registry, runner: &'a R, checkpoint: &'a C, output: &'a Output) -> Self {
        Self {
            registry,
            runner,
            checkpoint,
            output,
        }
    }

    /// Execute a run.
    ///
    /// Returns `Err` only for failures that stop the whole run: unknown target
    /// or service, failed registry login, failed cluster access. Per-service
    /// failures are recorded in the report.
    pub async fn run(&self, plan: &RunPlan) -> Result<RunReport> {
        let target = self.registry.resolve(&plan.target)?;
        let target_dir = self.registry.target_dir(&target);
        let context = DeployContext::new(target, target_dir);
        let target = context.target();

        let titles: Vec<&String> = plan.services.iter().collect();
        let services = target.select(&titles)?;

        self.output
            .progress(&format!("Deployment target is {}", target.title()));
        self.output.progress(&format!(
            "Selected services: {}",
            services
                .iter()
                .map(|s| s.title())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        let mut report = RunReport::new(
            target.title(),
            target.version().as_str(),
            services.iter().map(|s| s.title()),
        );
        let pipeline = Pipeline::new(self.runner, &context);

        self.output.progress("Logging in to the image registry...");
        self.run_target_stage(&pipeline, Stage::Authenticate).await?;
        self.output.progress("Configuring kubectl...");
        self.run_target_stage(&pipeline, Stage::ConfigureClusterAccess)
            .await?;

        if plan.clone_sources {
            self.output.progress("Obtaining packages...");
            for service in services.iter().filter(|s| s.source().is_some()) {
                self.output.progress(&format!("Module: {}...", service.title()));
                self.run_service_stage(&pipeline, Stage::CloneSource, service, &mut report)
                    .await;
            }
        }

        self.checkpoint.wait(CHECKPOINT_PROMPT).await;

        self.output.progress("Building packages...");
        for service in &services {
            if report.is_abandoned(service.title()) {
                continue;
            }
            self.output.progress(&format!("Module: {}...", service.title()));

            let mut rollout = vec![Stage::BuildTagPush];
            if target.reauthenticate() {
                rollout.push(Stage::Reauthenticate);
            }
            rollout.extend([Stage::RemoveExistingWorkload, Stage::PatchAndApplyWorkload]);

            let mut completed = true;
            for stage in rollout {
                if !self
                    .run_service_stage(&pipeline, stage, service, &mut report)
                    .await
                {
                    completed = false;
                    break;
                }
            }
            if completed {
                report.mark_deployed(service.title());
            }
        }

        for (enabled, kind) in [
            (plan.apply_load_balancers, ExposureKind::LoadBalancer),
            (plan.apply_node_ports, ExposureKind::NodePort),
        ] {
            if !enabled {
                continue;
            }
            self.output.progress(&format!("Applying {kind}s..."));
            for service in &services {
                if report.is_abandoned(service.title()) {
                    continue;
                }
                self.output.progress(&format!("Module: {}...", service.title()));
                self.run_service_stage(&pipeline, Stage::ApplyExposure(kind), service, &mut report)
                    .await;
            }
        }

        Ok(report)
    }

    async fn run_target_stage(
        &self,
        pipeline: &Pipeline<'_, R>,
        stage: Stage,
    ) -> Result<()> {
        match pipeline.run_for_target(stage).await {
            Outcome::Completed => Ok(()),
            Outcome::Skipped(reason) => {
                self.output.progress(&format!(" . {reason}"));
                Ok(())
            }
            Outcome::Tolerated(e) => {
                self.output.warning(&format!("{stage}: {e}"));
                Ok(())
            }
            Outcome::Abandoned(source) | Outcome::Aborted(source) => {
                Err(Error::RunAborted { stage, source })
            }
        }
    }

    /// Returns whether later stages for this service may run.
    async fn run_service_stage(
        &self,
        pipeline: &Pipeline<'_, R>,
        stage: Stage,
        service: &ServiceDescriptor,
        report: &mut RunReport,
    ) -> bool {
        let title = service.title();
        self.output
            .progress(&format!(" . {title}: {}...", describe(stage, pipeline)));

        let outcome = pipeline.run(stage, service).await;
        let proceed = outcome.allows_continue();

        match outcome {
            Outcome::Completed => {}
            Outcome::Skipped(reason) => {
                tracing::info!("{}: {} skipped: {}", title, stage, reason);
                self.output.progress(&format!(" . {title}: {reason}"));
            }
            Outcome::Tolerated(e) => {
                let warning = match stage {
                    Stage::ApplyExposure(kind) => {
                        Warning::exposure(title, format!("error while applying {kind}: {e}"))
                    }
                    _ => Warning::previous_workload(
                        title,
                        format!(
                            "could not remove the previous workload, \
                             it's likely there wasn't one running: {e}"
                        ),
                    ),
                };
                self.output.warning(&format!("{title}: {}", warning.message));
                report.warn(warning);
            }
            Outcome::Abandoned(e) | Outcome::Aborted(e) => {
                self.output
                    .error(&format!("{title}: {stage} failed: {e}"));
                report.abandon(title, stage, &e);
            }
        }

        proceed
    }
}

fn describe<R: CommandRunner + ?Sized>(stage: Stage, pipeline: &Pipeline<'_, R>) -> String {
    let target = pipeline.context().target();
    match stage {
        Stage::CloneSource => "cloning git repo".to_string(),
        Stage::BuildTagPush => format!("docker building for {}", target.platform()),
        Stage::Authenticate | Stage::Reauthenticate => "logging in to the registry".to_string(),
        Stage::ConfigureClusterAccess => "configuring kubectl".to_string(),
        Stage::RemoveExistingWorkload => "removing previous kubectl workload".to_string(),
        Stage::PatchAndApplyWorkload => format!(
            "updating YAML with version {} and applying",
            target.version()
        ),
        Stage::ApplyExposure(kind) => format!("applying {kind}"),
    }
}
