//! Argument parsing and terminal presentation helpers.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::tree::{display_order, sort_for_display, TreeNode};

/// Broom - resumable folder decluttering
///
/// Walk a directory tree entry by entry, keep what you need, delete what you
/// don't, and pick up later exactly where you left off.
#[derive(Parser, Debug, Clone)]
#[command(name = "broom")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Session store file to use instead of the per-user default
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the immediate children of a directory
    List {
        /// Directory to list
        directory: PathBuf,
    },

    /// Recursively list every file and directory under a root
    Scan {
        /// Root directory to flatten
        directory: PathBuf,

        /// Render the listing as a tree instead of flat paths
        #[arg(long, action = ArgAction::SetTrue)]
        tree: bool,
    },

    /// Start reviewing a folder, recording keep/delete decisions
    Clean {
        /// Folder to review
        directory: PathBuf,

        /// Record decisions without deleting anything
        #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Skip the per-entry delete confirmation
        #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
        yes: bool,
    },

    /// Resume a previously started review session
    Resume {
        /// Session number as shown by `broom sessions`
        session: usize,

        /// Record decisions without deleting anything
        #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Skip the per-entry delete confirmation
        #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
        yes: bool,
    },

    /// List saved review sessions
    Sessions,

    /// Delete a saved review session
    ///
    /// Removing a session shifts every later session number down by one.
    Forget {
        /// Session number as shown by `broom sessions`
        session: usize,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

/// Formats a byte count for display ("5.2 MB", "318 B").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let exponent = (((bytes as f64).ln() / 1024_f64.ln()) as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    format!("{:.1} {}", value, UNITS[exponent])
}

/// Renders a reconstructed forest as an indented ASCII tree, directories
/// first at every level.
pub fn render_tree(forest: &[TreeNode]) -> String {
    let mut refs: Vec<&TreeNode> = forest.iter().collect();
    sort_for_display(&mut refs);

    let mut out = String::new();
    render_level(&refs, "", &mut out);
    out
}

fn render_level(nodes: &[&TreeNode], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let connector = if is_last { "└── " } else { "├── " };

        if node.is_directory {
            out.push_str(&format!("{}{}{}/\n", prefix, connector, node.name));
        } else {
            out.push_str(&format!(
                "{}{}{} ({})\n",
                prefix,
                connector,
                node.name,
                format_size(node.size)
            ));
        }

        if !node.children.is_empty() {
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            render_level(&display_order(&node.children), &child_prefix, out);
        }
    }
}
