//! Local filesystem slot backend.
//!
//! Each slot is a `<key>.json` file inside a configured directory, accessed
//! via `tokio::fs` for async I/O.

use crate::error::{ErrorKind, Result};
use crate::{SlotBackend, SlotKey};
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

const SLOT_EXTENSION: &str = "json";

/// Local filesystem slot backend.
///
/// Stores slots as files in a directory on the local filesystem. Writes go to
/// a temporary sibling file first and are renamed into place, so a crash
/// mid-write leaves the previous slot contents intact.
///
/// # Examples
///
/// ```no_run
/// use stacks_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("local", "/var/lib/stacks").map_err(|e| e.to_string())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalBackend {
    name: String,
    /// Directory holding the slot files
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists but isn't a
    /// directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidRoot(root));
            }
        } else {
            // Non-async on purpose: happens once when the catalog is opened.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root, None))?;
        }
        Ok(Self { name: name.into(), root })
    }

    fn slot_path(&self, key: &SlotKey) -> PathBuf {
        self.root.join(format!("{key}.{SLOT_EXTENSION}"))
    }

    fn staging_path(&self, key: &SlotKey) -> PathBuf {
        self.root.join(format!(".{key}.{SLOT_EXTENSION}.tmp"))
    }

    fn map_io_error(e: std::io::Error, path: &Path, key: Option<&SlotKey>) -> ErrorKind {
        match (e.kind(), key) {
            (std::io::ErrorKind::NotFound, Some(key)) => ErrorKind::NotFound(key.to_string()),
            (std::io::ErrorKind::PermissionDenied, _) => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl SlotBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &SlotKey) -> Result<bool> {
        let path = self.slot_path(key);
        Ok(fs::try_exists(&path).await.map_err(|e| Self::map_io_error(e, &path, None))?)
    }

    async fn read(&self, key: &SlotKey) -> Result<Vec<u8>> {
        let path = self.slot_path(key);
        Ok(fs::read(&path).await.map_err(|e| Self::map_io_error(e, &path, Some(key)))?)
    }

    async fn write(&self, key: &SlotKey, data: &[u8]) -> Result<()> {
        let staging = self.staging_path(key);
        let path = self.slot_path(key);
        fs::write(&staging, data).await.map_err(|e| Self::map_io_error(e, &staging, None))?;
        if let Err(e) = fs::rename(&staging, &path).await {
            // Best effort; the staging file is hidden and overwritten next time anyway.
            _ = fs::remove_file(&staging).await;
            exn::bail!(Self::map_io_error(e, &path, None));
        }
        tracing::trace!(backend = %self.name, slot = %key, bytes = data.len(), "Slot replaced");
        Ok(())
    }
}
