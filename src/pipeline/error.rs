// ABOUTME: Error type for a single pipeline stage.
// ABOUTME: Wraps command and manifest failures so the orchestrator sees one type.

use std::path::PathBuf;

use crate::exec::ExecError;
use crate::manifest::ManifestError;

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Command(#[from] ExecError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("manifest update task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to remove previous clone {}: {source}", path.display())]
    RemoveClone {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
