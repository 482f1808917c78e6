//! In-memory slot backend for testing.

use crate::error::{ErrorKind, Result};
use crate::key::validate as validate_key;
use crate::{SlotBackend, SlotKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory slot backend for testing.
///
/// Slots are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation. Every write is
/// counted so tests can assert on persistence behaviour.
///
/// # Examples
///
/// ```
/// use stacks_storage::backend::MockBackend;
/// use stacks_storage::{SlotBackend, validate_key};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_slots([("books", b"[]")]);
/// let key = validate_key("books").map_err(|e| e.to_string())?;
/// assert!(backend.exists(&key).await.map_err(|e| e.to_string())?);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<SlotKey, Vec<u8>>>,
    writes: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend pre-populated with slots.
    ///
    /// Panics if any key fails validation. If test setup is wrong, then test
    /// should not pass.
    pub fn with_slots(slots: impl IntoIterator<Item = (impl AsRef<str>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (key, data) in slots {
            let Ok(validated) = validate_key(key.as_ref()) else {
                // The panic here is DELIBERATE. MockBackend is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockBackend::with_slots: invalid key {:?}", key.as_ref());
            };
            map.insert(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents of a slot, without going through the trait.
    pub async fn contents(&self, key: &str) -> Option<Vec<u8>> {
        let key = validate_key(key).ok()?;
        self.storage.read().await.get(&key).cloned()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let slots: [(&str, &str); 0] = [];
        Self::with_slots(slots)
    }
}

#[async_trait]
impl SlotBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &SlotKey) -> Result<bool> {
        Ok(self.storage.read().await.contains_key(key))
    }

    async fn read(&self, key: &SlotKey) -> Result<Vec<u8>> {
        self.storage
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.to_string())))
    }

    async fn write(&self, key: &SlotKey, data: &[u8]) -> Result<()> {
        self.storage.write().await.insert(key.clone(), data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
