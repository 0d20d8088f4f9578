use std::path::PathBuf;

use thiserror::Error;

/// Failures of the snapshot file itself.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot not found at {0:?}")]
    NotFound(PathBuf),
    #[error("snapshot {path:?} is malformed: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode snapshot for {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("i/o error on snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SnapshotError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// Errors that prevent the waitlist store from starting.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot load waitlist snapshot: {0}")]
    Persistence(#[from] SnapshotError),
    #[error("waitlist snapshot is inconsistent: {0}")]
    Corrupt(String),
}
