//! Session state stores keyed by a hash of the session id

use crate::{atomic_write, read_json, SessionStateRecord};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage key for a session id: 16 hex chars of its SHA-256 digest.
///
/// Session ids are opaque and may contain path separators, so they are
/// never used as file names directly.
pub fn state_key(session_id: &str) -> String {
    let digest = hex::encode(Sha256::digest(session_id.as_bytes()));
    digest[..16].to_string()
}

/// Best-effort key-value store for [`SessionStateRecord`]s.
///
/// `load` is fail-open: a missing or unreadable record is `None`.
pub trait StateStore {
    fn save(&self, session_id: &str, transcript_size: u64) -> Result<(), StateError>;

    fn load(&self, session_id: &str) -> Option<SessionStateRecord>;

    /// Remove the record; removing an absent record succeeds.
    fn delete(&self, session_id: &str) -> Result<(), StateError>;
}

/// One JSON file per session under a state directory
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("handoff_{}.json", state_key(session_id)))
    }

    /// Number of record files currently in the state directory
    pub fn count(&self) -> usize {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(_) => return 0,
        };
        entries
            .flatten()
            .filter(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.starts_with("handoff_") && name.ends_with(".json")
            })
            .count()
    }
}

impl StateStore for FileStateStore {
    fn save(&self, session_id: &str, transcript_size: u64) -> Result<(), StateError> {
        let record = SessionStateRecord::new(session_id, transcript_size);
        let json = serde_json::to_string(&record)?;
        atomic_write(&self.record_path(session_id), json.as_bytes())?;
        Ok(())
    }

    fn load(&self, session_id: &str) -> Option<SessionStateRecord> {
        read_json(&self.record_path(session_id))
    }

    fn delete(&self, session_id: &str) -> Result<(), StateError> {
        match std::fs::remove_file(self.record_path(session_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, used where no state should touch the filesystem
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    records: Mutex<HashMap<String, SessionStateRecord>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStateStore {
    fn save(&self, session_id: &str, transcript_size: u64) -> Result<(), StateError> {
        let record = SessionStateRecord::new(session_id, transcript_size);
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(state_key(session_id), record);
        Ok(())
    }

    fn load(&self, session_id: &str) -> Option<SessionStateRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&state_key(session_id))
            .cloned()
    }

    fn delete(&self, session_id: &str) -> Result<(), StateError> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&state_key(session_id));
        Ok(())
    }
}
