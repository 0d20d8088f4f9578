use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::errors::SnapshotError;

/// A JSON document on disk that is always replaced as a whole.
///
/// `save` writes to a sibling temp file, syncs it and renames it over the
/// target, so readers see either the previous document or the new one,
/// never a truncated mix. The type holds no data of its own; callers hand
/// it the complete value on every save.
#[derive(Clone, Debug)]
pub struct JsonSnapshotFile {
    file_path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and decode the document. A missing file is reported as
    /// `SnapshotError::NotFound` so callers can tell it apart from corruption.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<T, SnapshotError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound(self.file_path.clone()))
            }
            Err(e) => return Err(SnapshotError::io(&self.file_path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Decode {
            path: self.file_path.clone(),
            source,
        })
    }

    /// Encode `value` as pretty JSON and atomically replace the document.
    pub async fn save<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), SnapshotError> {
        let data = serde_json::to_vec_pretty(value).map_err(|source| SnapshotError::Encode {
            path: self.file_path.clone(),
            source,
        })?;

        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SnapshotError::io(parent, e))?;
        }

        let tmp_path = self.temp_path();
        if let Err(e) = write_synced(&tmp_path, &data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(SnapshotError::io(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(SnapshotError::io(&self.file_path, e));
        }
        Ok(())
    }

    // Same directory as the target so the rename never crosses filesystems.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.file_path
            .with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}
