//! In-memory index of the folders and files under the launcher roots.
//!
//! Builds walk the roots into local collections and publish them with a
//! single swap, so readers always observe one complete build.

mod entry;
mod result;
mod store;
mod walk;

pub use entry::{IndexSnapshot, IndexedEntry};
pub use result::{EntryKind, SearchResult};
pub use store::{BuildStats, IndexStore, ProgressSink};
pub use walk::{
    classify_walk_error, is_noise_file, is_pruned_dir_name, WalkErrorAction, NOISE_EXTENSIONS,
    PRUNED_DIR_NAMES,
};
