//! File-backed store for local device persistence.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{CacheError, KeyValueStore};

/// Key-Value store persisted as one JSON object on disk.
///
/// Every call reads the document fresh, so values written by a previous
/// process are visible after restart. Writes go to a sibling temp file that
/// is renamed over the original, so a crash mid-write leaves the old
/// document intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. The file is created lazily on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<BTreeMap<String, String>, CacheError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(CacheError::io(&self.path, e)),
        }
    }

    /// Read the document ahead of a rewrite. An unparsable document is moved
    /// aside to `<name>.corrupt` and replaced by an empty one, so writes keep
    /// working after the file was damaged.
    async fn read_document_for_write(&self) -> Result<BTreeMap<String, String>, CacheError> {
        match self.read_document().await {
            Err(CacheError::SerializeError(e)) => {
                let aside = self.path.with_extension("corrupt");
                tracing::warn!(
                    path = %self.path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "store document is corrupt, starting a fresh one"
                );
                tokio::fs::rename(&self.path, &aside)
                    .await
                    .map_err(|e| CacheError::io(&self.path, e))?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn write_document(
        &self,
        document: &BTreeMap<String, String>,
    ) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| CacheError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CacheError::io(&self.path, e))?;

        tracing::trace!(
            path = %self.path.display(),
            keys = document.len(),
            "store document written"
        );
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document_for_write().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document_for_write().await?;
        if document.remove(key).is_some() {
            self.write_document(&document).await?;
        }
        Ok(())
    }
}
