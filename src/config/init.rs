// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates hephaestus.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, DEFAULT_PLATFORM};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;
    tracing::info!("Wrote {}", config_path.display());

    Ok(())
}

fn template_yaml() -> String {
    format!(
        r#"# Service folders live in <deployment_root>/<target>/<folder>/ and hold
# 01-deployment.yml plus optional 02-load-balancer.yml and 04-node-port.yml.
deployment_root: deployment

targets:
  deployment_target_1:
    title: Deployment target 1
    region: eu-west-1
    cluster: my-cluster
    destination: 123456789012.dkr.ecr.eu-west-1.amazonaws.com
    version: "1"
    platform: {DEFAULT_PLATFORM}
    # credentials:
    #   access_key_id:
    #     env: AWS_ACCESS_KEY_ID
    #   secret_access_key:
    #     env: AWS_SECRET_ACCESS_KEY
    services:
      - title: API
        folder: api
        git: git@github.com:my-org/api.git
        label: api
      - title: Web
        folder: web
        label: web
"#
    )
}
