// ABOUTME: Stage bodies: registry login, cluster access, clone, build, remove, apply.
// ABOUTME: Every external effect goes through the CommandRunner capability.

use crate::exec::{CommandRunner, commands};
use crate::manifest::{self, ExposureKind};
use crate::registry::ServiceDescriptor;

use super::{DeployContext, Effect, Outcome, Stage, StageError};

/// Runs pipeline stages for one target.
pub struct Pipeline<'a, R: ?Sized> {
    runner: &'a R,
    context: &'a DeployContext,
}

impl<'a, R: CommandRunner + ?Sized> Pipeline<'a, R> {
    pub fn new(runner: &'a R, context: &'a DeployContext) -> Self {
        Self { runner, context }
    }

    pub fn context(&self) -> &DeployContext {
        self.context
    }

    /// Run a stage that concerns the target as a whole.
    pub async fn run_for_target(&self, stage: Stage) -> Outcome {
        let result = match stage {
            Stage::Authenticate | Stage::Reauthenticate => self.authenticate().await,
            Stage::ConfigureClusterAccess => self.configure_cluster_access().await,
            other => Ok(Effect::Skipped(format!("{other} needs a service"))),
        };
        Outcome::settle(stage, result)
    }

    /// Run a stage for one service.
    pub async fn run(&self, stage: Stage, service: &ServiceDescriptor) -> Outcome {
        let result = match stage {
            Stage::Authenticate | Stage::Reauthenticate => self.authenticate().await,
            Stage::ConfigureClusterAccess => self.configure_cluster_access().await,
            Stage::CloneSource => self.clone_source(service).await,
            Stage::BuildTagPush => self.build_tag_push(service).await,
            Stage::RemoveExistingWorkload => self.remove_existing_workload(service).await,
            Stage::PatchAndApplyWorkload => self.patch_and_apply_workload(service).await,
            Stage::ApplyExposure(kind) => self.apply_exposure(service, kind).await,
        };

        if let Err(ref e) = result {
            tracing::warn!("{}: {} failed: {}", service.title(), stage, e);
        }
        Outcome::settle(stage, result)
    }

    async fn authenticate(&self) -> Result<Effect, StageError> {
        let target = self.context.target();

        let token = self
            .runner
            .run(&commands::ecr_login_password(
                target.region(),
                target.credentials(),
            )?)
            .await?
            .stdout;

        let login = commands::registry_login(target.destination().registry_host(), &token)?;
        self.runner.run(&login).await?;

        tracing::info!("Logged in to {}", target.destination().registry_host());
        Ok(Effect::Applied)
    }

    async fn configure_cluster_access(&self) -> Result<Effect, StageError> {
        let target = self.context.target();
        let command =
            commands::update_kubeconfig(target.region(), target.cluster(), target.credentials())?;
        self.runner.run(&command).await?;

        tracing::info!("kubectl now targets cluster {}", target.cluster());
        Ok(Effect::Applied)
    }

    async fn clone_source(&self, service: &ServiceDescriptor) -> Result<Effect, StageError> {
        let (Some(repo), Some(clone_dir)) = (service.source(), self.context.clone_dir(service))
        else {
            return Ok(Effect::Skipped("no git repository to clone".to_string()));
        };

        match tokio::fs::remove_dir_all(&clone_dir).await {
            Ok(()) => tracing::debug!("Removed previous clone {}", clone_dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StageError::RemoveClone {
                    path: clone_dir,
                    source,
                });
            }
        }

        let service_dir = self.context.service_dir(service);
        let command = commands::git_clone(repo.url(), repo.clone_folder(), &service_dir)?;
        self.runner.run(&command).await?;

        Ok(Effect::Applied)
    }

    async fn build_tag_push(&self, service: &ServiceDescriptor) -> Result<Effect, StageError> {
        let target = self.context.target();
        let image = target.image_ref(service);
        let (build_dir, no_cache) = self.context.build_context(service);

        let build = commands::docker_build(&image, target.platform(), &build_dir, no_cache)?;
        self.runner.run(&build).await?;
        self.runner.run(&commands::docker_tag(&image)).await?;
        self.runner.run(&commands::docker_push(&image)).await?;

        tracing::info!("Pushed {}", image);
        Ok(Effect::Applied)
    }

    async fn remove_existing_workload(
        &self,
        service: &ServiceDescriptor,
    ) -> Result<Effect, StageError> {
        let manifest = self.context.workload_manifest(service);
        if !manifest.is_file() {
            return Ok(Effect::Skipped(format!(
                "no workload manifest at {}",
                manifest.display()
            )));
        }

        self.runner.run(&commands::kubectl_delete(&manifest)?).await?;
        Ok(Effect::Applied)
    }

    async fn patch_and_apply_workload(
        &self,
        service: &ServiceDescriptor,
    ) -> Result<Effect, StageError> {
        let manifest = self.context.workload_manifest(service);
        let image = self.context.target().image_ref(service);

        let (path, reference) = (manifest.clone(), image.to_string());
        tokio::task::spawn_blocking(move || manifest::patch_image(&path, &reference)).await??;
        self.runner.run(&commands::kubectl_apply(&manifest)?).await?;

        tracing::info!("Applied {} with image {}", manifest.display(), image);
        Ok(Effect::Applied)
    }

    async fn apply_exposure(
        &self,
        service: &ServiceDescriptor,
        kind: ExposureKind,
    ) -> Result<Effect, StageError> {
        let manifest = self.context.exposure_manifest(service, kind);
        if !manifest.is_file() {
            return Ok(Effect::Skipped(format!("Could not find {kind} yml file")));
        }

        self.runner.run(&commands::kubectl_apply(&manifest)?).await?;
        Ok(Effect::Applied)
    }
}
