use std::path::Path;

/// One file or folder seen by a walk. Never mutated after the walk that
/// produced it; a rebuild creates new entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEntry {
    pub path: Box<str>,
    pub modified_unix_secs: i64,
}

impl IndexedEntry {
    pub fn new(path: impl Into<Box<str>>, modified_unix_secs: i64) -> Self {
        Self {
            path: path.into(),
            modified_unix_secs,
        }
    }

    pub fn file_name(&self) -> &str {
        Path::new(self.path.as_ref())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.path.as_ref())
    }
}

/// Folders and files from a single build. The store swaps whole snapshots,
/// so the two halves always come from the same walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSnapshot {
    folders: Vec<IndexedEntry>,
    files: Vec<IndexedEntry>,
}

impl IndexSnapshot {
    pub fn new(folders: Vec<IndexedEntry>, files: Vec<IndexedEntry>) -> Self {
        Self { folders, files }
    }

    pub fn folders(&self) -> &[IndexedEntry] {
        &self.folders
    }

    pub fn files(&self) -> &[IndexedEntry] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Files first, then folders, each in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexedEntry> {
        self.files.iter().chain(self.folders.iter())
    }
}
