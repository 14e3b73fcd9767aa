// ABOUTME: Application-wide error types for hephaestus.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::{Stage, StageError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("could not find a matching deployment target for {0}")]
    UnknownTarget(String),

    #[error("service {service:?} is not registered for target {target}")]
    UnknownService { target: String, service: String },

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("deployment aborted during {stage}: {source}")]
    RunAborted {
        stage: Stage,
        #[source]
        source: StageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
