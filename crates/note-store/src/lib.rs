//! Persistent storage for notes and share mappings.
//!
//! Two namespaces, each backed by one JSON file in the data directory:
//! `notes.json` maps a note path to its body and metadata bag, and
//! `shares.json` maps a share hash back to a note path.
//!
//! The store gives single-key read/write semantics only. There is no
//! cross-key atomicity and no read-modify-write locking: callers that read a
//! record, change it, and put it back race with concurrent writers to the
//! same key, and the last write wins. That weak-consistency policy is part
//! of the storage contract, not an oversight.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the storage backend.
///
/// Callers are expected to map any of these to a generic "write failed" /
/// internal-error result; no retries are performed here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Rendering mode of a note body. Wire values are what the editor sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    #[default]
    Plain,
    Md,
}

/// Access-control and display metadata attached to a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteMeta {
    #[serde(default)]
    pub mode: NoteMode,
    /// Salted password digest. Present and non-empty iff the note is
    /// password protected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pw: Option<String>,
    #[serde(default)]
    pub share: bool,
    /// Unix seconds of the last body save. Absent until the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl NoteMeta {
    /// A note is protected iff it carries a non-empty password digest.
    pub fn is_protected(&self) -> bool {
        self.pw.as_deref().is_some_and(|pw| !pw.is_empty())
    }
}

/// A stored note: text body plus metadata.
///
/// A path that was never written reads back as `None`; callers treat that as
/// an empty note in the default mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub meta: NoteMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct NoteMap {
    notes: HashMap<String, NoteRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ShareMap {
    /// Maps share hash -> note path.
    shares: HashMap<String, String>,
}

/// File-backed store for the two namespaces.
pub struct Store {
    data_path: PathBuf,
    notes: RwLock<NoteMap>,
    shares: RwLock<ShareMap>,
}

impl Store {
    /// Open (or create) a store rooted at `data_path`.
    pub fn open<P: Into<PathBuf>>(data_path: P) -> Result<Self, StoreError> {
        let data_path = data_path.into();
        std::fs::create_dir_all(&data_path)?;

        let store = Self {
            data_path,
            notes: RwLock::new(NoteMap::default()),
            shares: RwLock::new(ShareMap::default()),
        };

        store.load_notes()?;
        store.load_shares()?;

        Ok(store)
    }

    // --- Notes namespace ---

    /// Get a note by path.
    pub fn get_note(&self, path: &str) -> Option<NoteRecord> {
        let map = self.notes.read().unwrap();
        map.notes.get(path).cloned()
    }

    /// Write a note, creating or overwriting it.
    pub fn put_note(&self, path: &str, record: NoteRecord) -> Result<(), StoreError> {
        {
            let mut map = self.notes.write().unwrap();
            map.notes.insert(path.to_string(), record);
        }
        self.save_notes()
    }

    /// Remove a note. Returns whether it existed.
    pub fn delete_note(&self, path: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut map = self.notes.write().unwrap();
            map.notes.remove(path).is_some()
        };
        if removed {
            self.save_notes()?;
        }
        Ok(removed)
    }

    // --- Share namespace ---

    /// Resolve a share hash to a note path.
    pub fn get_share(&self, hash: &str) -> Option<String> {
        let map = self.shares.read().unwrap();
        map.shares.get(hash).cloned()
    }

    /// Create or overwrite a share mapping.
    pub fn put_share(&self, hash: &str, path: &str) -> Result<(), StoreError> {
        {
            let mut map = self.shares.write().unwrap();
            map.shares.insert(hash.to_string(), path.to_string());
        }
        self.save_shares()
    }

    /// Remove a share mapping. Returns whether it existed.
    pub fn delete_share(&self, hash: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut map = self.shares.write().unwrap();
            map.shares.remove(hash).is_some()
        };
        if removed {
            self.save_shares()?;
        }
        Ok(removed)
    }

    // --- Persistence ---

    fn notes_path(&self) -> PathBuf {
        self.data_path.join("notes.json")
    }

    fn shares_path(&self) -> PathBuf {
        self.data_path.join("shares.json")
    }

    fn load_notes(&self) -> Result<(), StoreError> {
        let path = self.notes_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let map: NoteMap = serde_json::from_str(&content)?;
            *self.notes.write().unwrap() = map;
            tracing::info!("Loaded {} notes", self.notes.read().unwrap().notes.len());
        }
        Ok(())
    }

    fn save_notes(&self) -> Result<(), StoreError> {
        let map = self.notes.read().unwrap();
        let content = serde_json::to_string_pretty(&*map)?;
        std::fs::write(self.notes_path(), content)?;
        Ok(())
    }

    fn load_shares(&self) -> Result<(), StoreError> {
        let path = self.shares_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let map: ShareMap = serde_json::from_str(&content)?;
            *self.shares.write().unwrap() = map;
            tracing::info!(
                "Loaded {} share mappings",
                self.shares.read().unwrap().shares.len()
            );
        }
        Ok(())
    }

    fn save_shares(&self) -> Result<(), StoreError> {
        let map = self.shares.read().unwrap();
        let content = serde_json::to_string_pretty(&*map)?;
        std::fs::write(self.shares_path(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn note(body: &str) -> NoteRecord {
        NoteRecord {
            body: body.to_string(),
            meta: NoteMeta::default(),
        }
    }

    #[test]
    fn missing_note_reads_back_as_none() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        assert!(store.get_note("never-written").is_none());
    }

    #[test]
    fn put_then_get_roundtrips() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.put_note("foo", note("hello")).unwrap();

        let record = store.get_note("foo").unwrap();
        assert_eq!(record.body, "hello");
        assert_eq!(record.meta.mode, NoteMode::Plain);
        assert!(!record.meta.is_protected());
    }

    #[test]
    fn last_write_wins_on_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.put_note("foo", note("first")).unwrap();
        store.put_note("foo", note("second")).unwrap();

        assert_eq!(store.get_note("foo").unwrap().body, "second");
    }

    #[test]
    fn notes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = Store::open(dir.path()).unwrap();
            let mut record = note("persisted");
            record.meta.mode = NoteMode::Md;
            record.meta.pw = Some("digest".to_string());
            store.put_note("foo", record).unwrap();
        }

        let store = Store::open(dir.path()).unwrap();
        let record = store.get_note("foo").unwrap();
        assert_eq!(record.body, "persisted");
        assert_eq!(record.meta.mode, NoteMode::Md);
        assert!(record.meta.is_protected());
    }

    #[test]
    fn delete_note_removes_it() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.put_note("foo", note("x")).unwrap();
        assert!(store.delete_note("foo").unwrap());
        assert!(store.get_note("foo").is_none());
        assert!(!store.delete_note("foo").unwrap());
    }

    #[test]
    fn share_mappings_roundtrip_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.put_share("abc123", "foo").unwrap();
        assert_eq!(store.get_share("abc123").as_deref(), Some("foo"));

        assert!(store.delete_share("abc123").unwrap());
        assert!(store.get_share("abc123").is_none());
        assert!(!store.delete_share("abc123").unwrap());
    }

    #[test]
    fn share_mappings_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = Store::open(dir.path()).unwrap();
            store.put_share("abc123", "foo").unwrap();
        }

        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.get_share("abc123").as_deref(), Some("foo"));
    }

    #[test]
    fn empty_password_digest_is_not_protected() {
        let meta = NoteMeta {
            pw: Some(String::new()),
            ..NoteMeta::default()
        };
        assert!(!meta.is_protected());
        assert!(!NoteMeta::default().is_protected());
    }
}
