//! Durable triage-progress records.
//!
//! A [`SessionRecord`] tracks one review of one root folder: which entries
//! were kept, which were deleted, and the path of the next entry to look at.
//! The on-disk JSON uses camelCase field names; `sessions.json` files written
//! before the timestamp field existed still load unchanged.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One keep-or-delete decision: the entry's path and its size at triage time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEntry {
    pub file_path: PathBuf,
    pub size: u64,
}

/// Triage progress for one traversal of one root path.
///
/// `session_number` always equals the record's current index in the store;
/// deleting an earlier session shifts it down (see
/// [`store::SessionStore::delete`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_number: usize,
    /// Root folder this session reviews.
    pub path: PathBuf,
    /// Chronological delete decisions, append-only during normal operation.
    pub deleted_files: Vec<DecisionEntry>,
    /// Chronological keep decisions, append-only during normal operation.
    pub kept_files: Vec<DecisionEntry>,
    /// Path of the next unprocessed entry, or empty if never set.
    pub last_file_path_left_on: PathBuf,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// A fresh record with empty decision lists and no cursor.
    pub fn new(session_number: usize, path: PathBuf) -> Self {
        SessionRecord {
            session_number,
            path,
            deleted_files: Vec::new(),
            kept_files: Vec::new(),
            last_file_path_left_on: PathBuf::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// The persisted cursor, or `None` when it was never set.
    pub fn cursor(&self) -> Option<&Path> {
        if self.last_file_path_left_on.as_os_str().is_empty() {
            None
        } else {
            Some(&self.last_file_path_left_on)
        }
    }
}
