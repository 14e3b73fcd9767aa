// ABOUTME: CommandRunner backed by tokio child processes.
// ABOUTME: Pipes stdout/stderr, feeds stdin when the command carries input.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{CommandOutput, CommandRunner, CommandSpec, ExecError};

/// Runs commands as local child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
        tracing::debug!("Running `{}`", spec);

        let spawn_error = |source| ExecError::Spawn {
            command: spec.to_string(),
            source,
        };

        let mut command = Command::new(spec.program());
        command
            .args(spec.get_args())
            .envs(spec.get_env().iter().map(|(k, v)| (k, v)))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.get_stdin().is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        if let Some(dir) = spec.cwd() {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(spawn_error)?;

        // A child that exits early closes its end of the pipe. A failed write
        // is reported only if the child then exits successfully.
        let mut stdin_error = None;
        if let Some(input) = spec.get_stdin()
            && let Some(mut stdin) = child.stdin.take()
        {
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                tracing::debug!("Writing input of `{}` failed: {}", spec, e);
                stdin_error = Some(e);
            }
            // Closing stdin lets commands like `docker login --password-stdin` proceed.
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                "`{}` failed with exit code {:?}",
                spec,
                output.status.code()
            );
            return Err(ExecError::Failed {
                command: spec.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        if let Some(source) = stdin_error {
            return Err(ExecError::Stdin {
                command: spec.to_string(),
                source,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
