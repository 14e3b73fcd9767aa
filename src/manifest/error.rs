// ABOUTME: Manifest editing errors with SNAFU context selectors.
// ABOUTME: Separates unreadable files from valid documents of the wrong shape.

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ManifestError {
    #[snafu(display("manifest {} not found", path.display()))]
    NotFound { path: PathBuf },

    #[snafu(display("failed to read manifest {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse manifest {}: {source}", path.display()))]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("manifest {} has no {field}", path.display()))]
    Shape { path: PathBuf, field: String },

    #[snafu(display("cannot rewrite image in manifest {}: {reason}", path.display()))]
    Layout { path: PathBuf, reason: String },

    #[snafu(display("failed to write manifest {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestErrorKind {
    /// File missing, unreadable, or not a YAML document.
    Read,
    /// Valid document without an editable container image field.
    Shape,
    /// The updated document could not be written back.
    Write,
}

impl ManifestError {
    pub fn kind(&self) -> ManifestErrorKind {
        match self {
            ManifestError::NotFound { .. }
            | ManifestError::Read { .. }
            | ManifestError::Parse { .. } => ManifestErrorKind::Read,
            ManifestError::Shape { .. } | ManifestError::Layout { .. } => ManifestErrorKind::Shape,
            ManifestError::Write { .. } => ManifestErrorKind::Write,
        }
    }
}
