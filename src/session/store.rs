//! Index-addressed session storage backed by a single JSON file.
//!
//! Every mutating operation is a full read-modify-write of the whole file:
//! load, change the in-memory list, rewrite via a temp file and rename. That
//! makes each individual operation atomic from the caller's point of view,
//! but there is deliberately no coordination between concurrent writers —
//! two interleaved get-then-replace cycles against the same session lose the
//! earlier write (last writer wins on the whole file).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BroomError, Result};
use crate::session::SessionRecord;

/// Ordered collection of [`SessionRecord`]s addressed by index.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Opens a store backed by `path`. The file is created lazily on the
    /// first write; a missing file reads as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// Default store location (`<data dir>/broom/sessions.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("broom").join("sessions.json"))
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a fresh record for `root` and returns its index. The store is
    /// the single source of truth for how many sessions exist.
    pub fn create(&self, root: &Path) -> Result<usize> {
        let mut records = self.load_all()?;
        let number = records.len();
        records.push(SessionRecord::new(number, root.to_path_buf()));
        self.save_all(&records)?;
        tracing::debug!(session = number, path = %root.display(), "created session");
        Ok(number)
    }

    /// Returns the record at `index`.
    pub fn get(&self, index: usize) -> Result<SessionRecord> {
        let records = self.load_all()?;
        let count = records.len();
        records
            .into_iter()
            .nth(index)
            .ok_or(BroomError::OutOfRange { index, count })
    }

    /// Whole-record overwrite at `index`. The stored `session_number` is
    /// forced to `index` so it stays equal to the record's position.
    pub fn replace(&self, index: usize, mut record: SessionRecord) -> Result<()> {
        let mut records = self.load_all()?;
        if index >= records.len() {
            return Err(BroomError::OutOfRange {
                index,
                count: records.len(),
            });
        }
        record.session_number = index;
        records[index] = record;
        self.save_all(&records)
    }

    /// Removes the record at `index`.
    ///
    /// Every subsequent record shifts down by one and is renumbered to its
    /// new position. Any session index held by a caller before this call is
    /// therefore invalid afterwards and must be re-resolved.
    pub fn delete(&self, index: usize) -> Result<()> {
        let mut records = self.load_all()?;
        if index >= records.len() {
            return Err(BroomError::OutOfRange {
                index,
                count: records.len(),
            });
        }
        records.remove(index);
        for (position, record) in records.iter_mut().enumerate().skip(index) {
            record.session_number = position;
        }
        self.save_all(&records)?;
        tracing::debug!(session = index, "deleted session");
        Ok(())
    }

    /// Number of records in the store.
    pub fn count(&self) -> Result<usize> {
        Ok(self.load_all()?.len())
    }

    /// All records, oldest first.
    pub fn list(&self) -> Result<Vec<SessionRecord>> {
        self.load_all()
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| BroomError::Store(format!("failed to read session store: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BroomError::Store(format!("failed to parse session store: {}", e)))
    }

    fn save_all(&self, records: &[SessionRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BroomError::Store(format!("failed to create store directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(records)
            .map_err(|e| BroomError::Store(format!("failed to serialize session store: {}", e)))?;

        // Rewrite through a sibling temp file so a crash mid-write never
        // truncates the store.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .map_err(|e| BroomError::Store(format!("failed to write session store: {}", e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| BroomError::Store(format!("failed to replace session store: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> SessionStore {
        SessionStore::open(temp_dir.path().join("sessions.json"))
    }

    #[test]
    fn test_empty_store_counts_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_then_get_returns_empty_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let number = store.create(Path::new("/photos")).unwrap();
        assert_eq!(number, 0);

        let record = store.get(number).unwrap();
        assert_eq!(record.session_number, 0);
        assert_eq!(record.path, PathBuf::from("/photos"));
        assert!(record.deleted_files.is_empty());
        assert!(record.kept_files.is_empty());
        assert!(record.cursor().is_none());
    }

    #[test]
    fn test_create_assigns_sequential_numbers() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert_eq!(store.create(Path::new("/a")).unwrap(), 0);
        assert_eq!(store.create(Path::new("/b")).unwrap(), 1);
        assert_eq!(store.create(Path::new("/c")).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_get_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.create(Path::new("/a")).unwrap();

        match store.get(5) {
            Err(BroomError::OutOfRange { index, count }) => {
                assert_eq!(index, 5);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_replace_overwrites_whole_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let number = store.create(Path::new("/photos")).unwrap();

        let mut record = store.get(number).unwrap();
        record.kept_files.push(crate::session::DecisionEntry {
            file_path: PathBuf::from("/photos/keepme.jpg"),
            size: 9,
        });
        record.last_file_path_left_on = PathBuf::from("/photos/next.jpg");
        store.replace(number, record).unwrap();

        let reread = store.get(number).unwrap();
        assert_eq!(reread.kept_files.len(), 1);
        assert_eq!(reread.cursor(), Some(Path::new("/photos/next.jpg")));
    }

    #[test]
    fn test_replace_forces_session_number() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.create(Path::new("/a")).unwrap();
        store.create(Path::new("/b")).unwrap();

        let mut record = store.get(1).unwrap();
        record.session_number = 99;
        store.replace(1, record).unwrap();

        assert_eq!(store.get(1).unwrap().session_number, 1);
    }

    #[test]
    fn test_replace_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let record = SessionRecord::new(0, PathBuf::from("/a"));
        assert!(matches!(
            store.replace(0, record),
            Err(BroomError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_delete_shifts_and_renumbers() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.create(Path::new("/a")).unwrap();
        store.create(Path::new("/b")).unwrap();
        store.create(Path::new("/c")).unwrap();

        store.delete(0).unwrap();

        // What was at index 1 is now at index 0, renumbered to match.
        assert_eq!(store.count().unwrap(), 2);
        let first = store.get(0).unwrap();
        assert_eq!(first.path, PathBuf::from("/b"));
        assert_eq!(first.session_number, 0);
        let second = store.get(1).unwrap();
        assert_eq!(second.path, PathBuf::from("/c"));
        assert_eq!(second.session_number, 1);
    }

    #[test]
    fn test_delete_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(matches!(
            store.delete(0),
            Err(BroomError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.json");

        let store = SessionStore::open(&path);
        store.create(Path::new("/photos")).unwrap();
        drop(store);

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.get(0).unwrap().path, PathBuf::from("/photos"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deep").join("down").join("sessions.json");

        let store = SessionStore::open(&nested);
        store.create(Path::new("/a")).unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn test_corrupt_store_surfaces_store_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = SessionStore::open(&path);
        assert!(matches!(store.count(), Err(BroomError::Store(_))));
    }
}
