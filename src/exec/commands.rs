// ABOUTME: Typed constructors for every external command the pipeline issues.
// ABOUTME: Inputs are checked here so no value can be read as an extra option.

use std::path::Path;

use super::{CommandSpec, ExecError};
use crate::registry::Credentials;
use crate::types::ImageRef;

/// Username the registry expects with an ECR login token.
const REGISTRY_USER: &str = "AWS";

fn checked(field: &'static str, value: &str) -> Result<String, ExecError> {
    let invalid = |reason| ExecError::InvalidInput {
        field,
        value: value.to_string(),
        reason,
    };

    if value.trim().is_empty() {
        return Err(invalid("value is empty"));
    }
    if value.starts_with('-') {
        return Err(invalid("value starts with '-'"));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid("value contains control characters"));
    }

    Ok(value.to_string())
}

fn checked_path(field: &'static str, path: &Path) -> Result<String, ExecError> {
    let value = path.to_str().ok_or_else(|| ExecError::InvalidInput {
        field,
        value: path.display().to_string(),
        reason: "path is not valid UTF-8",
    })?;
    checked(field, value)
}

fn credential_env(credentials: Option<&Credentials>) -> Vec<(String, String)> {
    credentials.map(Credentials::to_env).unwrap_or_default()
}

/// `aws ecr get-login-password --region <region>`
pub fn ecr_login_password(
    region: &str,
    credentials: Option<&Credentials>,
) -> Result<CommandSpec, ExecError> {
    Ok(CommandSpec::new("aws")
        .args(["ecr", "get-login-password", "--region"])
        .arg(checked("region", region)?)
        .envs(credential_env(credentials)))
}

/// `docker login --username AWS --password-stdin <registry>` with the token on stdin.
pub fn registry_login(registry: &str, token: &str) -> Result<CommandSpec, ExecError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ExecError::InvalidInput {
            field: "login token",
            value: String::new(),
            reason: "value is empty",
        });
    }

    Ok(CommandSpec::new("docker")
        .args(["login", "--username", REGISTRY_USER, "--password-stdin"])
        .arg(checked("registry", registry)?)
        .stdin(token))
}

/// `aws eks --region <region> update-kubeconfig --name <cluster>`
pub fn update_kubeconfig(
    region: &str,
    cluster: &str,
    credentials: Option<&Credentials>,
) -> Result<CommandSpec, ExecError> {
    Ok(CommandSpec::new("aws")
        .args(["eks", "--region"])
        .arg(checked("region", region)?)
        .args(["update-kubeconfig", "--name"])
        .arg(checked("cluster", cluster)?)
        .envs(credential_env(credentials)))
}

/// `git clone -- <url> <folder>`, run inside `parent`.
pub fn git_clone(url: &str, folder: &str, parent: &Path) -> Result<CommandSpec, ExecError> {
    Ok(CommandSpec::new("git")
        .args(["clone", "--"])
        .arg(checked("git url", url)?)
        .arg(checked("clone folder", folder)?)
        .current_dir(parent))
}

/// `docker build -t <local tag> [--no-cache] --platform=<platform> .`, run inside `context`.
pub fn docker_build(
    image: &ImageRef,
    platform: &str,
    context: &Path,
    no_cache: bool,
) -> Result<CommandSpec, ExecError> {
    let platform = checked("platform", platform)?;
    let mut spec = CommandSpec::new("docker")
        .args(["build", "-t"])
        .arg(image.local_tag());
    if no_cache {
        spec = spec.arg("--no-cache");
    }
    Ok(spec
        .arg(format!("--platform={platform}"))
        .arg(".")
        .current_dir(context))
}

/// `docker tag <local tag> <image>`
pub fn docker_tag(image: &ImageRef) -> CommandSpec {
    CommandSpec::new("docker")
        .arg("tag")
        .arg(image.local_tag())
        .arg(image.to_string())
}

/// `docker push <image>`
pub fn docker_push(image: &ImageRef) -> CommandSpec {
    CommandSpec::new("docker").arg("push").arg(image.to_string())
}

/// `kubectl apply -f <manifest>`
pub fn kubectl_apply(manifest: &Path) -> Result<CommandSpec, ExecError> {
    Ok(CommandSpec::new("kubectl")
        .args(["apply", "-f"])
        .arg(checked_path("manifest path", manifest)?))
}

/// `kubectl delete -f <manifest>`
pub fn kubectl_delete(manifest: &Path) -> Result<CommandSpec, ExecError> {
    Ok(CommandSpec::new("kubectl")
        .args(["delete", "-f"])
        .arg(checked_path("manifest path", manifest)?))
}
