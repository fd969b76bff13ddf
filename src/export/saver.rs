//! Disk-backed recording saver
//!
//! Writes the assembled blob into a directory together with a JSON
//! metadata sidecar, mirroring the on-disk bundle layout a desktop host
//! would use.

use super::{FileSaver, RecordingBlob, RecordingMeta};
use crate::utils::AppResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Saves recordings into a fixed directory
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sidecar_path(&self, blob: &RecordingBlob) -> PathBuf {
        self.dir
            .join(Path::new(blob.filename).with_extension("json"))
    }
}

#[async_trait]
impl FileSaver for DiskSaver {
    async fn save(&self, blob: &RecordingBlob, meta: &RecordingMeta) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(blob.filename);
        tokio::fs::write(&path, &blob.data).await?;

        let sidecar = self.sidecar_path(blob);
        tokio::fs::write(&sidecar, serde_json::to_vec_pretty(meta)?).await?;

        tracing::info!(path = %path.display(), bytes = blob.len(), "saved recording");
        Ok(path)
    }
}
