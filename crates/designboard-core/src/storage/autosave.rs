//! Best-effort persistence of the layout after every committed change.

use crate::element::Element;
use crate::snapshot::{self, Snapshot};
use crate::storage::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use std::time::Instant;

/// Writes the layout snapshot under one fixed key.
///
/// Write failures are logged and counted, never returned: a failed autosave
/// leaves the in-memory session intact.
pub struct AutoSaver {
    /// Storage backend.
    storage: Arc<dyn Storage>,
    /// Key the snapshot is written under.
    key: String,
    /// Last successful write.
    last_saved: Option<Instant>,
    /// Failed writes since the last success.
    failures: u32,
}

impl AutoSaver {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            last_saved: None,
            failures: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn last_saved(&self) -> Option<Instant> {
        self.last_saved
    }

    /// Consecutive failed writes.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Persist `elements`. Returns whether the write succeeded.
    pub fn save(&mut self, elements: &[Element]) -> bool {
        match self.write(elements) {
            Ok(()) => {
                self.last_saved = Some(Instant::now());
                self.failures = 0;
                log::debug!("Saved {} elements under {}", elements.len(), self.key);
                true
            }
            Err(e) => {
                self.failures += 1;
                log::warn!("Autosave failed ({} in a row): {}", self.failures, e);
                false
            }
        }
    }

    fn write(&self, elements: &[Element]) -> StorageResult<()> {
        let text =
            snapshot::encode(elements).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.write(&self.key, &text)
    }

    /// Read the stored snapshot. `Ok(None)` when nothing is stored.
    pub fn load(&self) -> StorageResult<Option<Snapshot>> {
        let text = match self.storage.read(&self.key) {
            Ok(text) => text,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        snapshot::decode(&text)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Remove the stored snapshot.
    pub fn erase(&mut self) -> StorageResult<()> {
        self.storage.remove(&self.key)?;
        self.last_saved = None;
        Ok(())
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}
