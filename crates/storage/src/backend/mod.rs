//! Slot backend trait and implementations.
//!
//! This module defines the `SlotBackend` trait, which provides a unified
//! interface for whole-slot reads and writes across backends (a directory on
//! the local filesystem, an in-memory map for tests, a read-only decorator).

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::SlotKey;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;

/// Unified interface for slot storage backends.
///
/// All operations are asynchronous so that a backend may sit on slow or
/// remote storage without blocking the caller's runtime.
///
/// # Atomicity
/// A slot is always replaced whole. Implementations must make sure a reader
/// never observes a partially written slot.
///
/// # Examples
///
/// ```
/// use stacks_storage::{SlotBackend, SlotKey, error::Result};
///
/// async fn size_of_slot(backend: &dyn SlotBackend, key: &SlotKey) -> Result<u64> {
///     match backend.read_optional(key).await? {
///         Some(data) => Ok(data.len() as u64),
///         None => Ok(0),
///     }
/// }
/// ```
#[async_trait]
pub trait SlotBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// Check if a slot has been written.
    async fn exists(&self, key: &SlotKey) -> Result<bool>;

    /// Read the complete slot contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the slot
    /// has never been written.
    async fn read(&self, key: &SlotKey) -> Result<Vec<u8>>;

    /// Read the slot, treating a missing slot as `None`.
    ///
    /// Default implementation maps [`NotFound`](ErrorKind::NotFound) from
    /// [`read()`](Self::read) to `Ok(None)`.
    async fn read_optional(&self, key: &SlotKey) -> Result<Option<Vec<u8>>> {
        match self.read(key).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if matches!(&*err, ErrorKind::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Replace the slot contents.
    ///
    /// Creates the slot if it doesn't exist yet.
    ///
    /// ```no_run
    /// # use stacks_storage::{SlotBackend, validate_key, error::Result};
    /// # async fn example(backend: &dyn SlotBackend) -> Result<()> {
    /// let key = validate_key("library-books")?;
    /// backend.write(&key, b"[]").await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn write(&self, key: &SlotKey, data: &[u8]) -> Result<()>;
}
