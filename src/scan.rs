//! Directory enumeration and breadth-first tree flattening.
//!
//! `enumerate_dir` lists one level; `flatten_tree` drives it across a whole
//! tree with an explicit frontier loop, so traversal depth never grows the
//! call stack. A branch that fails to enumerate is reported in the listing's
//! `failures` instead of aborting the walk; only a failure on the requested
//! root itself is fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BroomError, Result};

/// One filesystem object discovered during enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Canonical absolute path, unique within one enumeration pass.
    pub path: PathBuf,
    /// Byte length for files; always 0 for directories.
    pub size: u64,
    pub is_directory: bool,
}

/// A branch the flattener could not enumerate. Its descendants are omitted
/// from the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// The outcome of flattening a tree: the (possibly partial) entry list plus
/// the branches that could not be read.
#[derive(Debug, Clone, Default)]
pub struct TreeListing {
    pub entries: Vec<Entry>,
    pub failures: Vec<ScanFailure>,
}

impl TreeListing {
    /// True when every branch was enumerated successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Returns the immediate children of `dir`, each resolved to an absolute path
/// with its size and directory flag. Does not descend into subdirectories.
///
/// Child entries whose metadata cannot be read are skipped; the directory
/// itself failing yields `NotFound`, `NotADirectory`, or `PermissionDenied`.
/// Ordering of the returned entries is filesystem-dependent.
pub fn enumerate_dir(dir: &Path) -> Result<Vec<Entry>> {
    let dir = fs::canonicalize(dir).map_err(|e| BroomError::from_io(e, dir))?;

    let meta = fs::metadata(&dir).map_err(|e| BroomError::from_io(e, &dir))?;
    if !meta.is_dir() {
        return Err(BroomError::NotADirectory(dir));
    }

    let read_dir = fs::read_dir(&dir).map_err(|e| BroomError::from_io(e, &dir))?;

    let mut entries = Vec::new();
    for entry_result in read_dir {
        let dir_entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = dir.join(dir_entry.file_name());

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(_) => continue,
        };

        let is_directory = metadata.is_dir();
        entries.push(Entry {
            path,
            size: if is_directory { 0 } else { metadata.len() },
            is_directory,
        });
    }

    Ok(entries)
}

/// Flattens the whole tree under `root` into a single entry list.
///
/// Breadth-first: the root's children come first, then their children, and so
/// on, one frontier of directories per pass. Each discovered entry (file or
/// directory) appears exactly once, in discovery order. A subdirectory that
/// fails to enumerate is recorded in `failures` and its descendants are
/// omitted; an error on `root` itself is returned as-is.
pub fn flatten_tree(root: &Path) -> Result<TreeListing> {
    let mut listing = TreeListing::default();
    let mut frontier: Vec<PathBuf> = Vec::new();

    for entry in enumerate_dir(root)? {
        if entry.is_directory {
            frontier.push(entry.path.clone());
        }
        listing.entries.push(entry);
    }

    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();

        for dir in frontier {
            let children = match enumerate_dir(&dir) {
                Ok(children) => children,
                Err(err) => {
                    tracing::warn!(path = %dir.display(), error = %err, "skipping unreadable branch");
                    listing.failures.push(ScanFailure {
                        path: dir,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for entry in children {
                if entry.is_directory {
                    next_frontier.push(entry.path.clone());
                }
                listing.entries.push(entry);
            }
        }

        frontier = next_frontier;
    }

    tracing::debug!(
        entries = listing.entries.len(),
        failures = listing.failures.len(),
        "flattened tree"
    );

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    mod enumerate_tests {
        use super::*;

        #[test]
        fn test_enumerate_lists_immediate_children() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();

            fs::write(root.join("a.txt"), b"hello").unwrap();
            fs::create_dir(root.join("sub")).unwrap();
            fs::write(root.join("sub").join("nested.txt"), b"deep").unwrap();

            let entries = enumerate_dir(&root).unwrap();

            assert_eq!(entries.len(), 2);
            let file = entries.iter().find(|e| !e.is_directory).unwrap();
            assert_eq!(file.path, root.join("a.txt"));
            assert_eq!(file.size, 5);

            let dir = entries.iter().find(|e| e.is_directory).unwrap();
            assert_eq!(dir.path, root.join("sub"));
            assert_eq!(dir.size, 0);
        }

        #[test]
        fn test_enumerate_does_not_emit_root() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();
            fs::write(root.join("only.txt"), b"x").unwrap();

            let entries = enumerate_dir(&root).unwrap();

            assert!(entries.iter().all(|e| e.path != root));
        }

        #[test]
        fn test_enumerate_empty_directory() {
            let temp_dir = TempDir::new().unwrap();
            let entries = enumerate_dir(temp_dir.path()).unwrap();
            assert!(entries.is_empty());
        }

        #[test]
        fn test_enumerate_nonexistent_path() {
            let result = enumerate_dir(Path::new("/definitely/not/here/12345"));
            assert!(matches!(result, Err(BroomError::NotFound(_))));
        }

        #[test]
        fn test_enumerate_file_is_not_a_directory() {
            let temp_dir = TempDir::new().unwrap();
            let file_path = temp_dir.path().join("plain.txt");
            fs::write(&file_path, b"not a dir").unwrap();

            let result = enumerate_dir(&file_path);
            assert!(matches!(result, Err(BroomError::NotADirectory(_))));
        }

        #[test]
        fn test_enumerate_includes_hidden_entries() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();
            fs::write(root.join(".hidden"), b"h").unwrap();
            fs::write(root.join("visible.txt"), b"v").unwrap();

            let entries = enumerate_dir(&root).unwrap();
            assert_eq!(entries.len(), 2);
        }
    }

    mod flatten_tests {
        use super::*;

        #[test]
        fn test_flatten_empty_directory() {
            let temp_dir = TempDir::new().unwrap();
            let listing = flatten_tree(temp_dir.path()).unwrap();

            assert!(listing.entries.is_empty());
            assert!(listing.is_complete());
        }

        #[test]
        fn test_flatten_collects_every_descendant_once() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();

            fs::write(root.join("x.txt"), vec![b'x'; 10]).unwrap();
            fs::create_dir(root.join("b")).unwrap();
            fs::write(root.join("b").join("y.txt"), vec![b'y'; 5]).unwrap();

            let listing = flatten_tree(&root).unwrap();

            assert_eq!(listing.entries.len(), 3);
            assert!(listing.is_complete());

            let paths: Vec<_> = listing.entries.iter().map(|e| e.path.clone()).collect();
            assert!(paths.contains(&root.join("x.txt")));
            assert!(paths.contains(&root.join("b")));
            assert!(paths.contains(&root.join("b").join("y.txt")));

            let x = listing.entries.iter().find(|e| e.path.ends_with("x.txt")).unwrap();
            assert_eq!((x.size, x.is_directory), (10, false));
            let b = listing.entries.iter().find(|e| e.path == root.join("b")).unwrap();
            assert_eq!((b.size, b.is_directory), (0, true));
        }

        #[test]
        fn test_flatten_breadth_first_level_order() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();

            fs::write(root.join("x.txt"), b"x").unwrap();
            fs::create_dir(root.join("b")).unwrap();
            fs::write(root.join("b").join("y.txt"), b"y").unwrap();
            fs::create_dir(root.join("b").join("c")).unwrap();
            fs::write(root.join("b").join("c").join("z.txt"), b"z").unwrap();

            let listing = flatten_tree(&root).unwrap();
            let pos = |suffix: &str| {
                listing
                    .entries
                    .iter()
                    .position(|e| e.path.ends_with(suffix))
                    .unwrap()
            };

            // Root's children precede grandchildren, which precede
            // great-grandchildren.
            assert!(pos("x.txt") < pos("y.txt"));
            assert!(pos("b") < pos("y.txt"));
            assert!(pos("y.txt") < pos("z.txt"));
            assert!(pos("b/c") < pos("z.txt"));
        }

        #[test]
        fn test_flatten_contains_nothing_outside_root() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();

            fs::create_dir(root.join("inside")).unwrap();
            fs::write(root.join("inside").join("f.txt"), b"f").unwrap();

            let listing = flatten_tree(&root.join("inside")).unwrap();

            assert_eq!(listing.entries.len(), 1);
            assert!(listing.entries[0].path.starts_with(root.join("inside")));
        }

        #[test]
        fn test_flatten_on_file_fails() {
            let temp_dir = TempDir::new().unwrap();
            let file_path = temp_dir.path().join("file.txt");
            fs::write(&file_path, b"oops").unwrap();

            let result = flatten_tree(&file_path);
            assert!(matches!(result, Err(BroomError::NotADirectory(_))));
        }

        #[test]
        fn test_flatten_missing_root_fails() {
            let result = flatten_tree(Path::new("/definitely/not/here/12345"));
            assert!(matches!(result, Err(BroomError::NotFound(_))));
        }

        #[test]
        fn test_flatten_deeply_nested_tree() {
            let temp_dir = TempDir::new().unwrap();
            let root = fs::canonicalize(temp_dir.path()).unwrap();

            let mut dir = root.clone();
            for i in 0..64 {
                dir = dir.join(format!("d{}", i));
            }
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("leaf.txt"), b"bottom").unwrap();

            let listing = flatten_tree(&root).unwrap();

            // 64 directories plus the leaf file.
            assert_eq!(listing.entries.len(), 65);
            assert!(listing.is_complete());
            assert!(listing.entries.last().unwrap().path.ends_with("leaf.txt"));
        }
    }
}
