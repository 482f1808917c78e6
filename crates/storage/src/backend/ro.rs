//! Read-only slot backend.
//!
//! Wraps another backend and prevents writes from executing, while still
//! indicating success on return.

use async_trait::async_trait;

use crate::{BackendHandle, SlotBackend, SlotKey, error::Result};

/// Read-only slot backend.
///
/// Wraps another backend and silently drops all writes, logging an
/// [`info event`](tracing::Event). Used for dry runs: the catalog behaves
/// normally in memory but the persisted slot is never touched.
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SlotBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn exists(&self, key: &SlotKey) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn read(&self, key: &SlotKey) -> Result<Vec<u8>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &SlotKey, data: &[u8]) -> Result<()> {
        tracing::info!(slot = %key, bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }
}
