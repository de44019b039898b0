//! Reconstructs a navigable hierarchy from a flat entry listing.
//!
//! `build_tree` is a pure function: the same (entries, root) pair always
//! produces a structurally identical forest. Entries whose path is not under
//! the root are ignored rather than rejected, which is the defined policy for
//! a mismatched root.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::scan::Entry;

/// One node of the reconstructed hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Final path segment.
    pub name: String,
    /// Segments from the root joined with `/`, used as display identity.
    pub relative_path: String,
    /// Absolute path of the underlying entry.
    pub full_path: PathBuf,
    pub size: u64,
    pub is_directory: bool,
    /// Children keyed by segment name. Key order is lexicographic; display
    /// ordering is a render-time concern, see [`display_order`].
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn implicit_dir(name: String, relative_path: String, full_path: PathBuf) -> Self {
        TreeNode {
            name,
            relative_path,
            full_path,
            size: 0,
            is_directory: true,
            children: BTreeMap::new(),
        }
    }

    /// Number of non-directory nodes in this subtree, the node itself
    /// included.
    pub fn leaf_count(&self) -> usize {
        let own = usize::from(!self.is_directory);
        own + self.children.values().map(TreeNode::leaf_count).sum::<usize>()
    }
}

/// Builds the forest of nodes rooted at `root_path` from a flat entry list.
///
/// Each entry's path is prefix-stripped against the root and walked segment by
/// segment; intermediate directory nodes are created implicitly from path
/// structure alone (directory flag set, size 0), and the terminal segment
/// adopts the entry's own size, flag, and path. With a breadth-first listing a
/// directory's own entry always arrives before its children, but adoption also
/// repairs implicit nodes created out of order.
pub fn build_tree(entries: &[Entry], root_path: &Path) -> Vec<TreeNode> {
    let mut top: BTreeMap<String, TreeNode> = BTreeMap::new();

    for entry in entries {
        let relative = match entry.path.strip_prefix(root_path) {
            Ok(rel) => rel,
            Err(_) => continue,
        };

        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(os) => Some(os.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            continue;
        }

        let mut level = &mut top;
        let mut partial = root_path.to_path_buf();
        for (idx, name) in segments.iter().enumerate() {
            partial.push(name);
            let terminal = idx + 1 == segments.len();

            let node = level.entry(name.clone()).or_insert_with(|| {
                TreeNode::implicit_dir(
                    name.clone(),
                    segments[..=idx].join("/"),
                    partial.clone(),
                )
            });

            if terminal {
                node.full_path = entry.path.clone();
                node.size = entry.size;
                node.is_directory = entry.is_directory;
            }

            level = &mut node.children;
        }
    }

    top.into_values().collect()
}

/// Orders sibling nodes for display: directories before files, then by name.
/// Applied only at render time, never stored.
pub fn display_order(nodes: &BTreeMap<String, TreeNode>) -> Vec<&TreeNode> {
    let mut sorted: Vec<&TreeNode> = nodes.values().collect();
    sort_for_display(&mut sorted);
    sorted
}

/// Sorts a slice of nodes into display order in place.
pub fn sort_for_display(nodes: &mut [&TreeNode]) {
    nodes.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
}
