//! JSON file backend.
//!
//! The file holds a single object, `{"renderApp": bool}`, pretty-printed
//! with two-space indentation so it stays hand-editable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{StatusStore, StoreBackend};
use crate::error::StoreError;

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StatusFile {
    #[serde(rename = "renderApp", default)]
    render_app: bool,
}

/// Flag persisted to a local JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the status file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn unavailable(&self, action: &str, err: impl std::fmt::Display) -> StoreError {
        StoreError::unavailable(
            StoreBackend::File,
            format!("failed to {} {}: {}", action, self.path.display(), err),
        )
    }
}

#[async_trait]
impl StatusStore for FileStore {
    async fn read(&self) -> Result<bool, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Status file missing, reporting false");
                return Ok(false);
            }
            Err(e) => return Err(self.unavailable("read", e)),
        };

        let status: StatusFile =
            serde_json::from_slice(&raw).map_err(|e| self.unavailable("parse", e))?;
        Ok(status.render_app)
    }

    async fn write(&self, enabled: bool) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(&StatusFile { render_app: enabled })
            .map_err(|e| self.unavailable("encode", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.unavailable("create directory for", e))?;
        }

        // Write beside the target and rename over it, so readers never see a
        // half-written file.
        let tmp = self.temp_path();
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| self.unavailable("write", e))?;
        file.write_all(&body)
            .await
            .map_err(|e| self.unavailable("write", e))?;
        file.sync_all()
            .await
            .map_err(|e| self.unavailable("sync", e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.unavailable("replace", e))?;

        debug!(path = %self.path.display(), enabled, "Status file written");
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::File
    }
}
