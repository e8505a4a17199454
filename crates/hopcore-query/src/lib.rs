use hopcore_index::{IndexSnapshot, IndexStore, IndexedEntry, SearchResult};

/// Result cap used by the launcher for both typed queries and the recency view.
pub const DEFAULT_LIMIT: usize = 60;

pub trait QueryEngine {
    /// Substring search over basenames and full paths. Files are scanned
    /// before folders and results keep build order; an empty query falls
    /// back to [`QueryEngine::recent`].
    fn search(&self, query: &str, limit: usize) -> Vec<SearchResult>;

    /// Most recently modified entries first. Entries with equal modification
    /// times come back in no guaranteed order.
    fn recent(&self, limit: usize) -> Vec<SearchResult>;
}

impl QueryEngine for IndexSnapshot {
    fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return self.recent(limit);
        }

        let mut hits = Vec::new();
        for phase in [self.files(), self.folders()] {
            if hits.len() >= limit {
                break;
            }
            for entry in phase {
                if entry_matches(entry, &needle) {
                    hits.push(SearchResult::from_entry(entry));
                    if hits.len() >= limit {
                        break;
                    }
                }
            }
        }
        hits
    }

    fn recent(&self, limit: usize) -> Vec<SearchResult> {
        let mut all: Vec<&IndexedEntry> = self.entries().collect();
        let newest_first =
            |a: &&IndexedEntry, b: &&IndexedEntry| b.modified_unix_secs.cmp(&a.modified_unix_secs);

        if limit < all.len() {
            if limit == 0 {
                return Vec::new();
            }
            all.select_nth_unstable_by(limit - 1, newest_first);
            all.truncate(limit);
        }
        all.sort_by(newest_first);
        all.into_iter().map(SearchResult::from_entry).collect()
    }
}

impl QueryEngine for IndexStore {
    fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.snapshot().search(query, limit)
    }

    fn recent(&self, limit: usize) -> Vec<SearchResult> {
        self.snapshot().recent(limit)
    }
}

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn entry_matches(entry: &IndexedEntry, needle_lower: &str) -> bool {
    contains_case_insensitive(entry.file_name(), needle_lower)
        || contains_case_insensitive(entry.path.as_ref(), needle_lower)
}

/// `needle_lower` must already be lower-cased.
pub fn contains_case_insensitive(haystack: &str, needle_lower: &str) -> bool {
    if haystack.is_ascii() && needle_lower.is_ascii() {
        contains_ascii_case_insensitive(haystack, needle_lower)
    } else {
        haystack.to_lowercase().contains(needle_lower)
    }
}

fn contains_ascii_case_insensitive(haystack: &str, needle_lower_ascii: &str) -> bool {
    if needle_lower_ascii.is_empty() {
        return true;
    }

    let h = haystack.as_bytes();
    let n = needle_lower_ascii.as_bytes();
    if n.len() > h.len() {
        return false;
    }

    let first = n[0];
    for start in 0..=h.len() - n.len() {
        if h[start].to_ascii_lowercase() != first {
            continue;
        }
        if h[start + 1..start + n.len()]
            .iter()
            .zip(&n[1..])
            .all(|(hb, nb)| hb.to_ascii_lowercase() == *nb)
        {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, mtime: i64) -> IndexedEntry {
        IndexedEntry::new(path, mtime)
    }

    fn paths(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.path.as_str()).collect()
    }

    fn sample() -> IndexSnapshot {
        IndexSnapshot::new(
            vec![entry("/a", 10), entry("/a/old", 20), entry("/b", 30), entry("/reports", 40)],
            vec![
                entry("/a/report.txt", 100),
                entry("/a/old/report-final.txt", 300),
                entry("/b/notes.md", 200),
            ],
        )
    }

    #[test]
    fn substring_matches_files_then_folders_in_build_order() {
        let results = sample().search("report", 10);
        assert_eq!(
            paths(&results),
            vec!["/a/report.txt", "/a/old/report-final.txt", "/reports"]
        );
    }

    #[test]
    fn query_is_trimmed_and_case_folded() {
        let files_only = IndexSnapshot::new(
            vec![],
            vec![
                entry("/a/report.txt", 100),
                entry("/a/old/report-final.txt", 300),
                entry("/b/notes.md", 200),
            ],
        );
        assert_eq!(
            paths(&files_only.search("  RePoRt ", 10)),
            vec!["/a/report.txt", "/a/old/report-final.txt"]
        );
    }

    #[test]
    fn files_can_exhaust_the_limit_before_folders() {
        let results = sample().search("report", 2);
        assert_eq!(paths(&results), vec!["/a/report.txt", "/a/old/report-final.txt"]);
    }

    #[test]
    fn folder_phase_respects_the_limit() {
        let snapshot = IndexSnapshot::new(
            vec![entry("/x/report-a", 1), entry("/x/report-b", 2)],
            vec![entry("/x/report.txt", 3)],
        );
        assert_eq!(snapshot.search("report", 2).len(), 2);
    }

    #[test]
    fn path_segments_match_too() {
        let results = sample().search("/old/", 10);
        assert_eq!(paths(&results), vec!["/a/old/report-final.txt"]);
    }

    #[test]
    fn empty_query_is_the_recency_view() {
        let snapshot = sample();
        assert_eq!(snapshot.search("", 10), snapshot.recent(10));
        assert_eq!(snapshot.search("   ", 3), snapshot.recent(3));
    }

    #[test]
    fn recent_orders_newest_first() {
        let snapshot = IndexSnapshot::new(
            vec![],
            vec![entry("/one", 100), entry("/three", 300), entry("/two", 200)],
        );
        assert_eq!(paths(&snapshot.recent(3)), vec!["/three", "/two", "/one"]);
    }

    #[test]
    fn recent_mixes_folders_and_files_and_truncates() {
        let results = sample().recent(4);
        assert_eq!(
            paths(&results),
            vec!["/a/old/report-final.txt", "/b/notes.md", "/a/report.txt", "/reports"]
        );
        assert!(sample().recent(0).is_empty());
    }

    #[test]
    fn empty_index_yields_nothing() {
        let empty = IndexSnapshot::default();
        assert!(empty.recent(60).is_empty());
        assert!(empty.search("", 60).is_empty());
        assert!(empty.search("x", 60).is_empty());
    }

    #[test]
    fn store_queries_its_current_snapshot() {
        let store = IndexStore::new();
        assert!(store.recent(DEFAULT_LIMIT).is_empty());
        store.replace(sample());
        assert_eq!(store.search("notes", DEFAULT_LIMIT).len(), 1);
        assert_eq!(store.recent(DEFAULT_LIMIT).len(), 7);
    }

    #[test]
    fn case_insensitive_containment() {
        assert!(contains_case_insensitive("HelloWorld", "hello"));
        assert!(!contains_case_insensitive("HelloWorld", "xyz"));
        assert!(contains_case_insensitive("Übersicht.PDF", "übersicht.pdf"));
        assert!(contains_case_insensitive("abc", ""));
        assert!(!contains_case_insensitive("ab", "abc"));
    }
}
