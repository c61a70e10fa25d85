//! Save records and save stores.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::state::PlayerState;

/// Errors raised by save stores. Best-effort writes log these and continue.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The storage medium rejected the write.
    #[error("cannot write save: {0}")]
    Write(#[from] io::Error),

    /// The record could not be serialized.
    #[error("cannot serialize save: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persisted snapshot of a session, written after every successful node
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    /// Key of the node the player is at.
    pub current_node_key: String,
    /// The full player state.
    pub player_state: PlayerState,
}

/// Durable storage for the single [`SaveRecord`].
///
/// Reads that fail (absent file, corrupt JSON) are "no saved game", never an
/// error the caller has to handle.
pub trait SaveStore {
    /// Load the saved record, if a valid one exists. A corrupt record is
    /// removed and reported as absent.
    fn load(&mut self) -> Option<SaveRecord>;

    /// Persist the record.
    fn store(&mut self, record: &SaveRecord) -> Result<(), SaveError>;

    /// Discard any saved record.
    fn clear(&mut self);
}

/// A [`SaveStore`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the given file path. Parent directories are created
    /// on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn load(&mut self) -> Option<SaveRecord> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read save");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt save, discarding");
                self.clear();
                None
            }
        }
    }

    fn store(&mut self, record: &SaveRecord) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }

    fn clear(&mut self) {
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "cannot remove save");
        }
    }
}

/// An in-memory [`SaveStore`] for tests and ephemeral sessions.
///
/// Round-trips through JSON so serialization behaves exactly like
/// [`FileStore`], and can simulate a full or unavailable medium.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
    /// When set, every write fails as if the medium were full.
    pub fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with raw JSON (possibly corrupt).
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            fail_writes: false,
        }
    }

    /// The raw stored JSON, if any.
    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn load(&mut self) -> Option<SaveRecord> {
        let json = self.json.as_ref()?;
        match serde_json::from_str(json) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "corrupt save, discarding");
                self.json = None;
                None
            }
        }
    }

    fn store(&mut self, record: &SaveRecord) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::Write(io::Error::other("storage full")));
        }
        self.json = Some(serde_json::to_string(record)?);
        Ok(())
    }

    fn clear(&mut self) {
        self.json = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphor_story::value::stat_block;

    fn record() -> SaveRecord {
        SaveRecord {
            current_node_key: "obey".to_string(),
            player_state: PlayerState::from_initial(&stat_block([
                ("sanity", 80.0),
                ("suspicion", 10.0),
            ])),
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("save.json"));

        assert!(store.load().is_none());
        store.store(&record()).unwrap();
        assert_eq!(store.load(), Some(record()));
    }

    #[test]
    fn corrupt_file_is_removed_and_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn clear_discards_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("save.json"));
        store.store(&record()).unwrap();
        store.clear();
        assert!(store.load().is_none());
        // Clearing twice is fine.
        store.clear();
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.store(&record()).unwrap();
        assert_eq!(store.load(), Some(record()));
    }

    #[test]
    fn memory_store_reports_full_medium() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::new()
        };
        assert!(store.store(&record()).is_err());
    }

    #[test]
    fn save_record_json_round_trips_exactly() {
        let original = record();
        let json = serde_json::to_string(&original).unwrap();
        let back: SaveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
