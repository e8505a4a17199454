use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::IndexedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Folder,
    App,
    Shortcut,
    File,
}

impl EntryKind {
    /// Classifies a path at read time. The directory test hits the
    /// filesystem, so the answer may differ from what the walk saw.
    pub fn from_path(path: &Path) -> Self {
        if std::fs::metadata(path).is_ok_and(|meta| meta.is_dir()) {
            return Self::Folder;
        }
        Self::from_extension(path)
    }

    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("exe") => Self::App,
            Some("lnk") => Self::Shortcut,
            _ => Self::File,
        }
    }
}

/// Presentation record handed to the search surface. Field names are part of
/// the bridge contract; only `id`, `name` and `path` are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access_time: Option<i64>,
}

impl SearchResult {
    pub fn from_entry(entry: &IndexedEntry) -> Self {
        let path = Path::new(entry.path.as_ref());
        let meta_left = path
            .parent()
            .map(|parent| parent.to_string_lossy().into_owned())
            .filter(|parent| !parent.is_empty());

        Self {
            id: entry.path.to_string(),
            name: entry.file_name().to_string(),
            path: entry.path.to_string(),
            kind: Some(EntryKind::from_path(path)),
            meta_left,
            meta_right: None,
            last_access_time: (entry.modified_unix_secs != 0).then_some(entry.modified_unix_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_falls_back_to_extension() {
        assert_eq!(EntryKind::from_extension(Path::new("C:/Tools/App.EXE")), EntryKind::App);
        assert_eq!(EntryKind::from_extension(Path::new("/x/Editor.lnk")), EntryKind::Shortcut);
        assert_eq!(EntryKind::from_extension(Path::new("/x/notes.md")), EntryKind::File);
        assert_eq!(EntryKind::from_extension(Path::new("/x/Makefile")), EntryKind::File);
    }

    #[test]
    fn existing_directory_is_a_folder_whatever_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("setup.exe");
        std::fs::create_dir(&odd).unwrap();
        assert_eq!(EntryKind::from_path(&odd), EntryKind::Folder);
    }

    #[test]
    fn result_derives_name_and_parent() {
        let result = SearchResult::from_entry(&IndexedEntry::new("/a/old/report-final.txt", 300));
        assert_eq!(result.id, "/a/old/report-final.txt");
        assert_eq!(result.name, "report-final.txt");
        assert_eq!(result.meta_left.as_deref(), Some("/a/old"));
        assert_eq!(result.kind, Some(EntryKind::File));
        assert_eq!(result.last_access_time, Some(300));
    }

    #[test]
    fn serialized_shape_uses_bridge_field_names() {
        let result = SearchResult::from_entry(&IndexedEntry::new("/b/notes.md", 0));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["id"], "/b/notes.md");
        assert_eq!(value["name"], "notes.md");
        assert_eq!(value["kind"], "File");
        assert_eq!(value["metaLeft"], "/b");
        assert!(value.get("metaRight").is_none());
        assert!(value.get("lastAccessTime").is_none());
    }

    #[test]
    fn only_identity_fields_are_required_on_input() {
        let parsed: SearchResult =
            serde_json::from_str(r#"{"id":"/x","name":"x","path":"/x"}"#).unwrap();
        assert_eq!(parsed.kind, None);
        assert_eq!(parsed.last_access_time, None);
    }
}
