//! JSON-file session store
//!
//! Keeps every key in one JSON object on disk. Writes go to a sibling temp
//! file that is renamed over the original, so a crash mid-write leaves either
//! the old or the new document, never a truncated one.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{SessionStore, StorageError, StorageResult};

type Document = BTreeMap<String, String>;

/// Session store persisted as a JSON object file
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Store backed by the JSON file at `path` (created on first write).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StorageResult<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::Corrupt(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &Document) -> StorageResult<()> {
        if document.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, bytes).await?;
        restrict_permissions(&tmp_path).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), keys = document.len(), "Session file written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> StorageResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> StorageResult<()> {
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_document().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&document).await
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
