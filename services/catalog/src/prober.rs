//! On-demand availability checks for dataset resources.
//!
//! A probe resolves the dataset id, refuses anything that is not a file under
//! the static asset root, then streams the whole file through the hasher to
//! report its size, modification time and content fingerprint. Nothing is
//! cached: every call hits the filesystem again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use registry::{fingerprint_reader, safe_segments, DatasetDescriptor, Registry, ResourceClass};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::DatasetProbeResult;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Dataset not found: {id}")]
    NotFound { id: String },

    #[error("Metadata only available for local datasets ({id} -> {url})")]
    Unsupported { id: String, url: String },

    #[error("Dataset {id} does not resolve inside the static root")]
    InvalidPath { id: String },
}

impl ProbeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProbeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ProbeError::Unsupported { .. } | ProbeError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

enum ReadFailure {
    Io(std::io::Error),
    Escaped,
}

impl From<std::io::Error> for ReadFailure {
    fn from(e: std::io::Error) -> Self {
        ReadFailure::Io(e)
    }
}

struct ResourceState {
    size: u64,
    modified: Option<DateTime<Utc>>,
    etag: String,
}

#[derive(Clone)]
pub struct Prober {
    registry: Arc<Registry>,
    static_root: PathBuf,
}

impl Prober {
    pub fn new(registry: Arc<Registry>, static_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            static_root: static_root.into(),
        }
    }

    /// Blocking; call from `spawn_blocking` inside async code.
    pub fn probe(&self, id: &str) -> Result<DatasetProbeResult, ProbeError> {
        let dataset = self
            .registry
            .lookup(id)
            .ok_or_else(|| ProbeError::NotFound { id: id.to_string() })?;

        let url_path = match dataset.resource_class() {
            ResourceClass::Local(p) => p,
            ResourceClass::Remote(url) => {
                return Err(ProbeError::Unsupported {
                    id: dataset.id.clone(),
                    url: url.to_string(),
                })
            }
        };

        let path = self
            .local_path(url_path)
            .ok_or_else(|| ProbeError::InvalidPath { id: dataset.id.clone() })?;

        match read_resource(&self.static_root, &path) {
            Ok(st) => {
                debug!(id = %dataset.id, size = st.size, etag = %st.etag, "probe: available");
                Ok(DatasetProbeResult::available(dataset, st.size, st.modified, st.etag))
            }
            Err(ReadFailure::Io(e)) => Ok(self.unavailable(dataset, &path, e)),
            Err(ReadFailure::Escaped) => {
                warn!(id = %dataset.id, path = %path.display(), "probe: resolved outside static root");
                Err(ProbeError::InvalidPath { id: dataset.id.clone() })
            }
        }
    }

    /// Lexical join of a root-relative url path onto the static root.
    fn local_path(&self, url_path: &str) -> Option<PathBuf> {
        let segments = safe_segments(url_path)?;
        let mut path = self.static_root.clone();
        for seg in segments {
            path.push(seg);
        }
        Some(path)
    }

    fn unavailable(&self, dataset: &DatasetDescriptor, path: &Path, e: std::io::Error) -> DatasetProbeResult {
        warn!(id = %dataset.id, path = %path.display(), "probe: error reading file: {e}");
        DatasetProbeResult::unavailable(dataset)
    }
}

fn read_resource(root: &Path, path: &Path) -> Result<ResourceState, ReadFailure> {
    // symlinks may still point out of the tree
    let root = std::fs::canonicalize(root)?;
    let path = std::fs::canonicalize(path)?;
    if !path.starts_with(&root) {
        return Err(ReadFailure::Escaped);
    }

    let file = std::fs::File::open(&path)?;
    let meta = file.metadata()?;
    if !meta.is_file() {
        return Err(ReadFailure::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let (size, etag) = fingerprint_reader(std::io::BufReader::new(file))?;

    Ok(ResourceState {
        size,
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
        etag,
    })
}
