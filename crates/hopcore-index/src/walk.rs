use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::debug;
use walkdir::WalkDir;

use crate::{IndexSnapshot, IndexedEntry};

/// Directories recorded themselves but never descended into.
pub const PRUNED_DIR_NAMES: [&str; 4] = ["node_modules", ".git", "dist", "build"];

/// File extensions left out of the index.
pub const NOISE_EXTENSIONS: [&str; 2] = ["tmp", "log"];

const SEEN_CAPACITY_HINT: usize = 15_000;

/// What a walk does with an entry it failed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkErrorAction {
    /// Drop the entry, keep walking its siblings.
    Skip,
    /// Drop the entry and everything below it.
    Prune,
    /// The root itself is unreadable; its walk ends and the next root starts.
    Fatal,
}

pub fn classify_walk_error(err: &walkdir::Error) -> WalkErrorAction {
    if err.depth() == 0 {
        WalkErrorAction::Fatal
    } else if err.loop_ancestor().is_some() {
        WalkErrorAction::Prune
    } else {
        WalkErrorAction::Skip
    }
}

pub fn is_pruned_dir_name(name: &OsStr) -> bool {
    let lower = name.to_string_lossy().to_lowercase();
    PRUNED_DIR_NAMES.contains(&lower.as_str())
}

pub fn is_noise_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| NOISE_EXTENSIONS.contains(&ext.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryClass {
    Folder,
    File,
}

pub(crate) struct WalkOutcome {
    pub(crate) snapshot: IndexSnapshot,
    pub(crate) skipped: usize,
}

/// Walks every root depth-first and collects the entries worth indexing.
/// `on_entry` sees each kept entry once, in walk order.
pub(crate) fn walk_roots<F>(roots: &[PathBuf], mut on_entry: F) -> WalkOutcome
where
    F: FnMut(EntryClass, &IndexedEntry),
{
    let mut folders = Vec::new();
    let mut files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(SEEN_CAPACITY_HINT);
    let mut skipped = 0usize;

    for root in roots {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.clone());
        let mut entries = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    skipped += 1;
                    match classify_walk_error(&err) {
                        WalkErrorAction::Skip | WalkErrorAction::Prune => {
                            debug!(error = %err, "skipping unreadable entry");
                            continue;
                        }
                        WalkErrorAction::Fatal => {
                            debug!(root = %root.display(), error = %err, "root unreadable");
                            break;
                        }
                    }
                }
            };

            let is_dir = entry.file_type().is_dir();
            if !seen.insert(entry.path().to_path_buf()) {
                if is_dir {
                    entries.skip_current_dir();
                }
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    skipped += 1;
                    debug!(path = %entry.path().display(), error = %err, "stat failed");
                    continue;
                }
            };

            let indexed = IndexedEntry::new(
                entry.path().to_string_lossy().into_owned(),
                modified_unix_secs(&metadata),
            );

            if is_dir {
                on_entry(EntryClass::Folder, &indexed);
                folders.push(indexed);
                if is_pruned_dir_name(entry.file_name()) {
                    entries.skip_current_dir();
                }
            } else {
                if is_noise_file(entry.path()) {
                    continue;
                }
                on_entry(EntryClass::File, &indexed);
                files.push(indexed);
            }
        }
    }

    WalkOutcome {
        snapshot: IndexSnapshot::new(folders, files),
        skipped,
    }
}

fn modified_unix_secs(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|since| since.as_secs() as i64)
        .unwrap_or(0)
}
