//! Drives keep/delete decisions over a flattened listing and records them in
//! the session store.
//!
//! Deletion is a direct, immediate filesystem mutation with no undo. A failed
//! removal is surfaced as-is and leaves both the cursor and the session
//! record untouched, so a file is never recorded as deleted unless it
//! actually was.

use std::fs;
use std::path::Path;

use crate::error::{BroomError, Result};
use crate::scan::{flatten_tree, Entry, ScanFailure};
use crate::session::store::SessionStore;
use crate::session::{DecisionEntry, SessionRecord};

/// Counts for the end-of-session summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageStats {
    pub total_entries: usize,
    pub kept: usize,
    pub deleted: usize,
    /// Bytes freed by delete decisions, from sizes captured at triage time.
    pub reclaimed_bytes: u64,
}

/// One in-progress review: a fresh flattened listing, the session record it
/// feeds, and the cursor into the listing.
#[derive(Debug)]
pub struct TriageEngine {
    session_number: usize,
    record: SessionRecord,
    entries: Vec<Entry>,
    failures: Vec<ScanFailure>,
    cursor: usize,
    dry_run: bool,
}

impl TriageEngine {
    /// Starts a new session over `root`: flattens the tree, appends a fresh
    /// record to the store, and places the cursor on the first entry.
    pub fn start(store: &SessionStore, root: &Path) -> Result<Self> {
        let root = fs::canonicalize(root).map_err(|e| BroomError::from_io(e, root))?;
        let listing = flatten_tree(&root)?;
        let session_number = store.create(&root)?;
        let record = store.get(session_number)?;

        Ok(TriageEngine {
            session_number,
            record,
            entries: listing.entries,
            failures: listing.failures,
            cursor: 0,
            dry_run: false,
        })
    }

    /// Resumes a stored session: re-enumerates the recorded root (the
    /// filesystem is the source of truth for what exists now) and relocates
    /// the persisted cursor by exact path match. A cursor that no longer
    /// matches anything, or was never set, lands on the first entry.
    pub fn resume(store: &SessionStore, session_number: usize) -> Result<Self> {
        let record = store.get(session_number)?;
        let listing = flatten_tree(&record.path)?;

        let cursor = record
            .cursor()
            .and_then(|path| listing.entries.iter().position(|e| e.path == path))
            .unwrap_or(0);

        tracing::debug!(session = session_number, cursor, "resumed session");

        Ok(TriageEngine {
            session_number,
            record,
            entries: listing.entries,
            failures: listing.failures,
            cursor,
            dry_run: false,
        })
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn session_number(&self) -> usize {
        self.session_number
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Branches the flattener could not read when this engine was built.
    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The entry under the cursor, if any remain.
    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Records a keep decision for the current entry and advances.
    pub fn keep(&mut self, store: &SessionStore) -> Result<()> {
        let entry = self.current().ok_or(BroomError::NothingLeft)?.clone();

        self.record.kept_files.push(DecisionEntry {
            file_path: entry.path,
            size: entry.size,
        });
        self.commit(store)
    }

    /// Deletes the current entry from disk, records the decision, and
    /// advances. Directories are removed recursively. In dry-run mode the
    /// decision is recorded but nothing is removed.
    pub fn delete(&mut self, store: &SessionStore) -> Result<()> {
        let entry = self.current().ok_or(BroomError::NothingLeft)?.clone();

        if !self.dry_run {
            let removal = if entry.is_directory {
                fs::remove_dir_all(&entry.path)
            } else {
                fs::remove_file(&entry.path)
            };
            removal.map_err(|e| BroomError::from_io(e, &entry.path))?;
            tracing::debug!(path = %entry.path.display(), "deleted entry");
        }

        self.record.deleted_files.push(DecisionEntry {
            file_path: entry.path,
            size: entry.size,
        });
        self.commit(store)
    }

    /// Advances past the current entry without recording a decision or
    /// touching the store.
    pub fn skip(&mut self) {
        self.cursor = (self.cursor + 1).min(self.entries.len());
    }

    /// Kept/deleted totals for this session's record.
    pub fn stats(&self) -> TriageStats {
        TriageStats {
            total_entries: self.entries.len(),
            kept: self.record.kept_files.len(),
            deleted: self.record.deleted_files.len(),
            reclaimed_bytes: self.record.deleted_files.iter().map(|d| d.size).sum(),
        }
    }

    /// Advances the cursor, points the persisted cursor at the next entry
    /// (or the final entry when none follow), and replaces the record.
    fn commit(&mut self, store: &SessionStore) -> Result<()> {
        self.record.last_file_path_left_on = self
            .entries
            .get(self.cursor + 1)
            .or_else(|| self.entries.get(self.cursor))
            .map(|e| e.path.clone())
            .unwrap_or_default();

        store.replace(self.session_number, self.record.clone())?;
        self.cursor += 1;
        Ok(())
    }
}
