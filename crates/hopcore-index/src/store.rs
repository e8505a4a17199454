use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::info;

use crate::walk::walk_roots;
use crate::{IndexSnapshot, SearchResult};

/// Receives the preview stream of a progressive build.
pub trait ProgressSink {
    fn on_loading_changed(&mut self, loading: bool);
    fn on_batch(&mut self, batch: Vec<SearchResult>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub folders: usize,
    pub files: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Holds the current snapshot. Walks run without the lock; only the final
/// swap takes the write side.
#[derive(Debug, Default)]
pub struct IndexStore {
    snapshot: RwLock<Arc<IndexSnapshot>>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn replace(&self, snapshot: IndexSnapshot) {
        let next = Arc::new(snapshot);
        let previous = std::mem::replace(&mut *self.snapshot.write(), next);
        drop(previous);
    }

    pub fn build_full(&self, roots: &[PathBuf]) -> BuildStats {
        let started = Instant::now();
        let outcome = walk_roots(roots, |_, _| {});
        let stats = BuildStats {
            folders: outcome.snapshot.folders().len(),
            files: outcome.snapshot.files().len(),
            skipped: outcome.skipped,
            elapsed: started.elapsed(),
        };

        self.replace(outcome.snapshot);
        info!(
            roots = roots.len(),
            folders = stats.folders,
            files = stats.files,
            skipped = stats.skipped,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "full index build finished"
        );
        stats
    }

    /// Walks like [`IndexStore::build_full`] while streaming kept entries to
    /// `sink` in batches of `batch_size`. The snapshot is replaced once, after
    /// the last batch and before loading is switched off.
    pub fn build_progressive<S>(&self, roots: &[PathBuf], batch_size: usize, sink: &mut S) -> BuildStats
    where
        S: ProgressSink + ?Sized,
    {
        let batch_size = batch_size.max(1);
        let started = Instant::now();
        sink.on_loading_changed(true);

        let mut batch = Vec::with_capacity(batch_size);
        let mut batches = 0usize;
        let outcome = walk_roots(roots, |_, entry| {
            batch.push(SearchResult::from_entry(entry));
            if batch.len() >= batch_size {
                sink.on_batch(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)));
                batches += 1;
            }
        });
        if !batch.is_empty() {
            sink.on_batch(batch);
            batches += 1;
        }

        let stats = BuildStats {
            folders: outcome.snapshot.folders().len(),
            files: outcome.snapshot.files().len(),
            skipped: outcome.skipped,
            elapsed: started.elapsed(),
        };
        self.replace(outcome.snapshot);
        sink.on_loading_changed(false);

        info!(
            roots = roots.len(),
            folders = stats.folders,
            files = stats.files,
            skipped = stats.skipped,
            batches,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "progressive index build finished"
        );
        stats
    }
}
