// ABOUTME: Process execution capability used by every pipeline stage.
// ABOUTME: Commands are typed descriptors run directly, never through a shell.

pub mod commands;
mod process;

pub use process::ProcessRunner;

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

/// One external command, fully described before it runs.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
    stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(vars);
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn get_env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn get_stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }
}

// Env values and stdin carry secrets; only names and the command line are shown.
impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_names: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("cwd", &self.cwd)
            .field("env", &env_names)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(&self.args);
        write!(f, "{}", shell_words::join(words))
    }
}

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Errors from building or running external commands.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write input of `{command}`: {source}")]
    Stdin {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {}: {}", describe_exit(.code), .stderr.trim())]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

/// Runs commands to completion. Implemented by the real process runner and
/// by test doubles.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command, returning its output if it exits successfully.
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments() {
        let spec = CommandSpec::new("git")
            .args(["clone", "--", "https://example.com/a b.git"])
            .current_dir("/tmp");
        assert_eq!(spec.to_string(), "git clone -- 'https://example.com/a b.git'");
    }

    #[test]
    fn debug_redacts_secrets() {
        let spec = CommandSpec::new("docker")
            .envs([("AWS_SECRET_ACCESS_KEY".to_string(), "hunter2".to_string())])
            .stdin("token-value");
        let debug = format!("{spec:?}");
        assert!(debug.contains("AWS_SECRET_ACCESS_KEY"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("token-value"));
    }

    #[test]
    fn failed_error_mentions_exit_code() {
        let err = ExecError::Failed {
            command: "kubectl apply -f x.yml".to_string(),
            code: Some(1),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`kubectl apply -f x.yml` exited with code 1: boom"
        );
    }
}
