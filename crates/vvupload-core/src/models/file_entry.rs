//! Committed file entry model

use serde::{Deserialize, Serialize};

/// A file that finished uploading and resolved to a usable URL, or one
/// pre-seeded from an external list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Storage object key. Absent for entries that were never finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Durable (public or signed) URL.
    pub url: String,
    /// Poster frame URL for videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// List length when the upload started.
    #[serde(default)]
    pub index: usize,
}

impl FileEntry {
    pub fn new(key: impl Into<String>, url: impl Into<String>, index: usize) -> Self {
        Self {
            key: Some(key.into()),
            url: url.into(),
            preview_url: None,
            index,
        }
    }

    /// Entry without a storage key; removing it never calls the backend.
    pub fn unkeyed(url: impl Into<String>, index: usize) -> Self {
        Self {
            key: None,
            url: url.into(),
            preview_url: None,
            index,
        }
    }

    #[must_use]
    pub fn with_preview_url(mut self, preview_url: Option<String>) -> Self {
        self.preview_url = preview_url;
        self
    }

    /// The storage key, if it is present and non-blank.
    pub fn storage_key(&self) -> Option<&str> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deserializes_external_list_format() {
        let entries: Vec<FileEntry> = serde_json::from_str(
            r#"[
                {"key": "cp_1clip.mp4", "url": "https://cdn/x", "previewUrl": "https://cdn/x.jpg", "index": 0},
                {"url": "https://legacy/y"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            entries[0],
            FileEntry::new("cp_1clip.mp4", "https://cdn/x", 0)
                .with_preview_url(Some("https://cdn/x.jpg".to_string()))
        );
        assert_eq!(entries[1], FileEntry::unkeyed("https://legacy/y", 0));
    }

    #[test]
    fn storage_key_ignores_blank_keys() {
        let mut entry = FileEntry::new("  ", "https://cdn/x", 0);
        assert_eq!(entry.storage_key(), None);
        entry.key = Some("cp_1a.png".to_string());
        assert_eq!(entry.storage_key(), Some("cp_1a.png"));
    }
}
