//! Persistent storage for registered entries
//!
//! Layout (one file per slot):
//!
//! <data_dir>/
//! ├── entries.json                   # JSON array of entries, newest first
//! ├── entries.json.corrupt           # Copy of an unreadable slot, if any
//! └── registry.log                   # TUI log output

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::core::{Entry, EntryPersistence, StorageError};

/// Default slot name
pub const DEFAULT_SLOT: &str = "entries";

/// A named slot stored as `<dir>/<slot>.json`
#[derive(Debug, Clone)]
pub struct JsonSlotStore {
    dir: PathBuf,
    slot: String,
}

impl JsonSlotStore {
    pub fn new(dir: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            slot: slot.into(),
        }
    }

    /// Slot location from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir(), config.storage.slot.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// File backing the slot
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.slot))
    }

    fn corrupt_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json.corrupt", self.slot))
    }

    /// Keep an unreadable slot around so the next save does not destroy it
    fn preserve_corrupt(&self, path: &Path) {
        let backup = self.corrupt_path();
        match std::fs::copy(path, &backup) {
            Ok(_) => tracing::warn!("Unreadable slot copied to {}", backup.display()),
            Err(err) => tracing::warn!(
                "Failed to preserve unreadable slot {}: {}",
                path.display(),
                err
            ),
        }
    }
}

impl EntryPersistence for JsonSlotStore {
    fn load(&self) -> Result<Vec<Entry>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| {
            self.preserve_corrupt(&path);
            StorageError::Decode {
                slot: self.slot.clone(),
                source,
            }
        })
    }

    fn save(&self, entries: &[Entry]) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let content = serde_json::to_string_pretty(entries)?;
        let path = self.path();

        // Write to a sibling temp file, then rename over the slot
        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| StorageError::io(&path, e.error))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: Option<Vec<Entry>>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// In-memory slot; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with stored entries
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let store = Self::new();
        store.lock().entries = Some(entries);
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make subsequent loads fail
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make subsequent saves fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Last successfully saved contents (`None` if never written)
    pub fn snapshot(&self) -> Option<Vec<Entry>> {
        self.lock().entries.clone()
    }

    /// Number of successful saves
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }
}

impl EntryPersistence for MemoryStore {
    fn load(&self) -> Result<Vec<Entry>, StorageError> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(inner.entries.clone().unwrap_or_default())
    }

    fn save(&self, entries: &[Entry]) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        inner.entries = Some(entries.to_vec());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntryId, Gender, Preview, Skill};
    use tempfile::TempDir;

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry {
                id: EntryId(1_700_000_000_002),
                full_name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "1234567890".to_string(),
                gender: Gender::Female,
                skills: vec![Skill::React, Skill::Html].into(),
                profile_pic: Some("jane.png".to_string()),
                preview: Some(Preview::from_parts("image/png", "iVBORw0KGgo=")),
            },
            Entry {
                id: EntryId(1_700_000_000_001),
                full_name: "John Roe".to_string(),
                email: "john@y.org".to_string(),
                phone: "0987654321".to_string(),
                gender: Gender::Male,
                skills: vec![Skill::Css, Skill::JavaScript].into(),
                profile_pic: None,
                preview: None,
            },
        ]
    }

    #[test]
    fn test_missing_slot_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonSlotStore::new(temp.path(), DEFAULT_SLOT);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_slot_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = JsonSlotStore::new(temp.path().join("nested"), DEFAULT_SLOT);
        let entries = sample_entries();

        store.save(&entries).unwrap();
        assert!(store.path().exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, entries);
        // Order is part of the contract
        assert_eq!(loaded[0].id, EntryId(1_700_000_000_002));
        assert_eq!(loaded[0].skills.joined(), "React, HTML");
    }

    #[test]
    fn test_save_replaces_slot() {
        let temp = TempDir::new().unwrap();
        let store = JsonSlotStore::new(temp.path(), "candidates");
        store.save(&sample_entries()).unwrap();
        store.save(&sample_entries()[1..]).unwrap();

        assert_eq!(store.load().unwrap().len(), 1);
        assert!(temp.path().join("candidates.json").exists());
    }

    #[test]
    fn test_reads_browser_style_json() {
        let temp = TempDir::new().unwrap();
        let store = JsonSlotStore::new(temp.path(), DEFAULT_SLOT);
        std::fs::write(
            store.path(),
            r#"[{"fullName":"Jane","email":"jane@x.com","phone":"1234567890",
                 "gender":"Female","skills":["HTML","CSS"],"profilePic":{},"id":1712345678901,
                 "preview":"data:image/png;base64,AAAA"}]"#,
        )
        .unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, EntryId(1712345678901));
        assert_eq!(entries[0].profile_pic, None);
    }

    #[test]
    fn test_corrupt_slot_is_preserved() {
        let temp = TempDir::new().unwrap();
        let store = JsonSlotStore::new(temp.path(), DEFAULT_SLOT);
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
        let backup = temp.path().join("entries.json.corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{not json");
    }

    #[test]
    fn test_memory_store_failures() {
        let store = MemoryStore::with_entries(sample_entries());
        assert_eq!(store.load().unwrap().len(), 2);

        store.fail_writes(true);
        assert!(store.save(&[]).is_err());
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.snapshot().map(|e| e.len()), Some(2));

        store.fail_reads(true);
        assert!(matches!(store.load(), Err(StorageError::Unavailable(_))));
    }
}
