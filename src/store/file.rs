use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::error::AppError;

use super::RecordStore;

/// Stores each collection as `<dir>/<name>.json`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|err| {
            AppError::Storage(format!("failed to create data dir {}: {err}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn read_raw(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.path_for(name);
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(collection = name, bytes = bytes.len(), "collection read");
                Ok(Some(bytes))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Storage(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn write_raw(&self, name: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(name);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, bytes).await.map_err(|err| {
            AppError::Storage(format!("failed to write {}: {err}", tmp_path.display()))
        })?;
        // Rename is the commit point; a crash before it leaves the old content intact.
        fs::rename(&tmp_path, &path).await.map_err(|err| {
            AppError::Storage(format!("failed to replace {}: {err}", path.display()))
        })?;

        debug!(collection = name, bytes = bytes.len(), "collection written");
        Ok(())
    }
}
