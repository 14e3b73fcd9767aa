// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording command runner and on-disk deployment fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use async_trait::async_trait;
use hephaestus::config::Config;
use hephaestus::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};
use hephaestus::registry::Registry;
use parking_lot::Mutex;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("hephaestus=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Program and arguments joined by single spaces, without shell quoting.
pub fn plain(spec: &CommandSpec) -> String {
    std::iter::once(spec.program())
        .chain(spec.get_args().iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

type FailWhen = Box<dyn Fn(&CommandSpec) -> bool + Send + Sync>;

/// Records every command instead of running it.
///
/// `aws ecr get-login-password` answers with a fixed token. Commands matching
/// a registered predicate fail with exit code 1.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    failures: Mutex<Vec<FailWhen>>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_when(&self, predicate: impl Fn(&CommandSpec) -> bool + Send + Sync + 'static) {
        self.failures.lock().push(Box::new(predicate));
    }

    /// Fail any command whose line contains `needle`.
    pub fn fail_matching(&self, needle: &'static str) {
        self.fail_when(move |spec| plain(spec).contains(needle));
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().clone()
    }

    /// Command lines in issue order.
    pub fn lines(&self) -> Vec<String> {
        self.calls.lock().iter().map(plain).collect()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        self.calls.lock().push(command.clone());

        if self.failures.lock().iter().any(|fail| fail(command)) {
            return Err(ExecError::Failed {
                command: command.to_string(),
                code: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }

        let stdout = if command.get_args().iter().any(|a| a == "get-login-password") {
            "token\n".to_string()
        } else {
            String::new()
        };
        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

#[allow(dead_code)]
pub const WORKLOAD: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: svc
spec:
  replicas: 2
  template:
    metadata:
      labels:
        app: svc
    spec:
      containers:
        - name: svc
          image: registry.example.com/svc:v2
          ports:
            - containerPort: 8080
"#;

/// A temporary project with a config and a single `prod` target.
#[allow(dead_code)]
pub struct Fixture {
    pub dir: TempDir,
    pub registry: Registry,
}

#[allow(dead_code)]
impl Fixture {
    /// Services are `(title, folder, git)`; labels are the lowercased folder.
    pub fn new(services: &[(&str, &str, Option<&str>)]) -> Self {
        Self::with_target_options(services, "")
    }

    /// Extra `key: value` lines are added to the target block.
    pub fn with_target_options(services: &[(&str, &str, Option<&str>)], extra: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("deployment");

        let mut yaml = format!(
            "deployment_root: {}\n\
             targets:\n\
             \x20 prod:\n\
             \x20   title: Production\n\
             \x20   region: eu-west-1\n\
             \x20   cluster: main\n\
             \x20   destination: 123.dkr.ecr.eu-west-1.amazonaws.com/team\n\
             \x20   version: 3\n",
            root.display()
        );
        for line in extra.lines().map(str::trim).filter(|l| !l.is_empty()) {
            yaml.push_str(&format!("    {line}\n"));
        }
        yaml.push_str("    services:\n");
        for (title, folder, git) in services {
            yaml.push_str(&format!(
                "      - title: {title}\n        folder: {folder}\n        label: {}\n",
                folder.to_lowercase()
            ));
            if let Some(git) = git {
                yaml.push_str(&format!("        git: {git}\n"));
            }
            fs::create_dir_all(root.join("prod").join(folder)).unwrap();
        }

        fs::write(dir.path().join("hephaestus.yml"), &yaml).unwrap();
        let registry = Registry::new(Config::from_yaml(&yaml).unwrap());
        Self { dir, registry }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn service_dir(&self, folder: &str) -> PathBuf {
        self.dir.path().join("deployment").join("prod").join(folder)
    }

    pub fn write(&self, folder: &str, file: &str, contents: &str) -> PathBuf {
        let path = self.service_dir(folder).join(file);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_workload(&self, folder: &str) -> PathBuf {
        self.write(folder, "01-deployment.yml", WORKLOAD)
    }

    pub fn read(&self, folder: &str, file: &str) -> String {
        fs::read_to_string(self.service_dir(folder).join(file)).unwrap()
    }
}
