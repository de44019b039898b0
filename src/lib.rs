//! Broom - a resumable folder decluttering library
//!
//! This crate provides the traversal-and-session engine behind the Broom
//! application: flatten a directory tree into a reviewable listing, rebuild
//! it as a navigable hierarchy, and persist keep/delete progress so a review
//! can be resumed later.

pub mod cli;
pub mod config;
pub mod error;
pub mod scan;
pub mod session;
pub mod tree;
pub mod triage;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use error::{BroomError, Result};
pub use scan::{enumerate_dir, flatten_tree, Entry, ScanFailure, TreeListing};
pub use session::store::SessionStore;
pub use session::{DecisionEntry, SessionRecord};
pub use tree::{build_tree, TreeNode};
pub use triage::{TriageEngine, TriageStats};
