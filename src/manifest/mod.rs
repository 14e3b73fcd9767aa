// ABOUTME: Workload manifest editing and per-service manifest file names.
// ABOUTME: Rewrites the first container's image and replaces the file atomically.

mod error;
mod splice;

pub use error::{ManifestError, ManifestErrorKind};

use error::{ParseSnafu, ReadSnafu, WriteSnafu};
use serde_yaml::Value;
use snafu::ResultExt;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Workload manifest inside each service folder.
pub const WORKLOAD_MANIFEST: &str = "01-deployment.yml";

/// Optional network exposure attached to a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureKind {
    LoadBalancer,
    NodePort,
}

impl ExposureKind {
    /// Manifest file name inside the service folder.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExposureKind::LoadBalancer => "02-load-balancer.yml",
            ExposureKind::NodePort => "04-node-port.yml",
        }
    }
}

impl fmt::Display for ExposureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureKind::LoadBalancer => write!(f, "LoadBalancer"),
            ExposureKind::NodePort => write!(f, "NodePort"),
        }
    }
}

enum Segment {
    Key(&'static str),
    Index(usize),
}

const IMAGE_PATH: [Segment; 6] = [
    Segment::Key("spec"),
    Segment::Key("template"),
    Segment::Key("spec"),
    Segment::Key("containers"),
    Segment::Index(0),
    Segment::Key("image"),
];

/// Point the manifest's first container at `image`.
///
/// Only the image scalar's text changes: comments, key order, and the
/// quoting of every other value stay byte-for-byte as written. The file is
/// replaced by rename, so a failed write leaves the previous contents in place.
pub fn patch_image(path: &Path, image: &str) -> Result<(), ManifestError> {
    let result = rewrite(path, image);
    if let Err(ref e) = result {
        tracing::error!("Could not update image in manifest: {}", e);
    }
    result
}

fn rewrite(path: &Path, image: &str) -> Result<(), ManifestError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ManifestError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut doc: Value = serde_yaml::from_str(&content).context(ParseSnafu { path })?;

    let slot = image_slot(&mut doc).map_err(|field| ManifestError::Shape {
        path: path.to_path_buf(),
        field,
    })?;
    let previous = match slot {
        Value::String(previous) => previous.clone(),
        other => {
            return Err(ManifestError::Layout {
                path: path.to_path_buf(),
                reason: format!("image is {} rather than a string", kind_name(other)),
            });
        }
    };
    tracing::debug!("{}: image {:?} -> {:?}", path.display(), previous, image);
    if previous == image {
        return Ok(());
    }
    *slot = Value::String(image.to_string());

    let rendered = splice::replace_scalar(&content, &previous, image, &doc).ok_or_else(|| {
        ManifestError::Layout {
            path: path.to_path_buf(),
            reason: format!("no editable occurrence of image {previous:?}"),
        }
    })?;
    write_atomic(path, &rendered)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "empty",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Walk to the image field, reporting the first path that does not exist.
fn image_slot(doc: &mut Value) -> Result<&mut Value, String> {
    let mut current = doc;
    let mut walked = String::new();

    for segment in &IMAGE_PATH {
        let next = match segment {
            Segment::Key(key) => {
                if !walked.is_empty() {
                    walked.push('.');
                }
                walked.push_str(key);
                current.get_mut(*key)
            }
            Segment::Index(index) => {
                walked.push_str(&format!("[{index}]"));
                current.get_mut(*index)
            }
        };

        current = match next {
            Some(value) => value,
            None => return Err(walked),
        };
    }

    Ok(current)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), ManifestError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path)
        .context(ReadSnafu { path })?
        .permissions();

    let mut file = NamedTempFile::new_in(dir).context(WriteSnafu { path })?;
    file.write_all(contents.as_bytes())
        .context(WriteSnafu { path })?;
    file.as_file()
        .set_permissions(permissions)
        .context(WriteSnafu { path })?;
    file.as_file().sync_all().context(WriteSnafu { path })?;
    file.persist(path)
        .map_err(|e| e.error)
        .context(WriteSnafu { path })?;

    Ok(())
}
