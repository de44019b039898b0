use broom::cli::{format_size, render_tree, Args, Command};
use broom::config::UserConfig;
use broom::scan::{enumerate_dir, flatten_tree};
use broom::session::store::SessionStore;
use broom::tree::build_tree;
use broom::triage::TriageEngine;
use broom::{BroomError, Result};

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let store = SessionStore::open(resolve_store_path(&args, &config)?);

    match args.command {
        Command::List { directory } => cmd_list(&directory),
        Command::Scan { directory, tree } => cmd_scan(&directory, tree),
        Command::Clean {
            directory,
            dry_run,
            yes,
        } => {
            let engine = TriageEngine::start(&store, &directory)?;
            println!(
                "Started session {} for {}",
                engine.session_number(),
                engine.record().path.display()
            );
            run_review(engine, &store, &config, dry_run, yes)
        }
        Command::Resume {
            session,
            dry_run,
            yes,
        } => {
            let engine = TriageEngine::resume(&store, session)?;
            println!(
                "Resumed session {} for {}",
                engine.session_number(),
                engine.record().path.display()
            );
            run_review(engine, &store, &config, dry_run, yes)
        }
        Command::Sessions => cmd_sessions(&store),
        Command::Forget { session } => {
            store.delete(session)?;
            println!("Forgot session {} (later sessions shifted down)", session);
            Ok(())
        }
    }
}

/// CLI flag beats config override beats the per-user default location.
fn resolve_store_path(args: &Args, config: &UserConfig) -> Result<PathBuf> {
    args.store
        .clone()
        .or_else(|| config.store_path.clone())
        .or_else(SessionStore::default_path)
        .ok_or_else(|| BroomError::Store("could not determine a session store location".into()))
}

fn cmd_list(directory: &Path) -> Result<()> {
    let entries = enumerate_dir(directory)?;

    for entry in &entries {
        if entry.is_directory {
            println!("{}/", entry.path.display());
        } else {
            println!("{}  {}", entry.path.display(), format_size(entry.size));
        }
    }
    println!("{} entries", entries.len());
    Ok(())
}

fn cmd_scan(directory: &Path, tree: bool) -> Result<()> {
    let root = fs::canonicalize(directory).map_err(|e| BroomError::from_io(e, directory))?;
    let listing = flatten_tree(&root)?;

    if tree {
        println!("{}/", root.display());
        print!("{}", render_tree(&build_tree(&listing.entries, &root)));
    } else {
        for entry in &listing.entries {
            if entry.is_directory {
                println!("{}/", entry.path.display());
            } else {
                println!("{}  {}", entry.path.display(), format_size(entry.size));
            }
        }
    }

    println!("{} entries", listing.entries.len());
    report_failures(&listing.failures);
    Ok(())
}

fn cmd_sessions(store: &SessionStore) -> Result<()> {
    let records = store.list()?;

    if records.is_empty() {
        println!("No sessions saved.");
        return Ok(());
    }

    for record in records {
        let created = record
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {}  kept: {}  deleted: {}  created: {}",
            record.session_number,
            record.path.display(),
            record.kept_files.len(),
            record.deleted_files.len(),
            created
        );
    }
    Ok(())
}

fn report_failures(failures: &[broom::ScanFailure]) {
    for failure in failures {
        eprintln!("Warning: could not read {}: {}", failure.path.display(), failure.reason);
    }
}

/// Interactive review loop: one prompt per entry, decisions recorded in the
/// session store as they are made.
fn run_review(
    mut engine: TriageEngine,
    store: &SessionStore,
    config: &UserConfig,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    engine.set_dry_run(dry_run);

    if dry_run {
        println!("[DRY RUN] No files will be deleted");
    }
    report_failures(engine.failures());

    if engine.entries().is_empty() {
        println!("Nothing to review in {}", engine.record().path.display());
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = String::new();

    while let Some(entry) = engine.current().cloned() {
        // Entries removed out of band (e.g. a parent directory was deleted
        // earlier in this review) are passed over silently.
        if !entry.path.exists() {
            engine.skip();
            continue;
        }

        if entry.is_directory {
            println!(
                "[{}/{}] {}/ (directory)",
                engine.cursor() + 1,
                engine.entries().len(),
                entry.path.display()
            );
        } else {
            println!(
                "[{}/{}] {} ({})",
                engine.cursor() + 1,
                engine.entries().len(),
                entry.path.display(),
                format_size(entry.size)
            );
        }

        print!("  [k]eep  [d]elete  [s]kip  [q]uit > ");
        io::stdout().flush().ok();

        input.clear();
        if stdin.lock().read_line(&mut input).is_err() || input.is_empty() {
            break;
        }

        match input.trim().to_lowercase().as_str() {
            "k" | "keep" => engine.keep(store)?,
            "d" | "delete" => {
                if config.confirm_delete && !yes && !dry_run {
                    print!("  Delete {}? This cannot be undone. [y/N] ", entry.path.display());
                    io::stdout().flush().ok();
                    input.clear();
                    if stdin.lock().read_line(&mut input).is_err() {
                        break;
                    }
                    if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                        continue;
                    }
                }
                // A failed delete is reported and leaves the cursor in
                // place; the session record is not touched.
                if let Err(e) = engine.delete(store) {
                    eprintln!("Failed to delete {}: {}", entry.path.display(), e);
                }
            }
            "s" | "skip" => engine.skip(),
            "q" | "quit" => break,
            other => {
                if !other.is_empty() {
                    println!("  Unrecognized input: {}", other);
                }
            }
        }
    }

    let stats = engine.stats();
    if dry_run {
        println!("\n[DRY RUN] Complete");
        println!("   Would have kept: {} entries", stats.kept);
        println!(
            "   Would have deleted: {} entries ({})",
            stats.deleted,
            format_size(stats.reclaimed_bytes)
        );
    } else {
        println!("\nSession {} summary", engine.session_number());
        println!("   Kept: {} entries", stats.kept);
        println!(
            "   Deleted: {} entries ({} reclaimed)",
            stats.deleted,
            format_size(stats.reclaimed_bytes)
        );
        if !engine.is_done() {
            println!(
                "   Resume later with: broom resume {}",
                engine.session_number()
            );
        }
    }

    Ok(())
}
