//! Committed file list.
//!
//! The controller owns the ordered list of uploaded entries. Consumers never
//! share it: the change callback receives a fresh copy on every mutation.

use std::fmt;

use crate::backend::UploadBackend;
use crate::models::FileEntry;
use crate::{Error, Result};

/// Callback invoked with a copy of the list after each local mutation.
pub type ChangeCallback = Box<dyn Fn(Vec<FileEntry>) + Send + Sync>;

#[derive(Default)]
pub struct FileListController {
    entries: Vec<FileEntry>,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for FileListController {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FileListController")
            .field("entries", &self.entries)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl FileListController {
    pub fn new(entries: Vec<FileEntry>) -> Self {
        Self {
            entries,
            on_change: None,
        }
    }

    pub fn on_change(&mut self, callback: impl Fn(Vec<FileEntry>) + Send + Sync + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self, max_num: usize) -> bool {
        self.entries.len() >= max_num
    }

    /// Append a committed entry and notify.
    pub fn append(&mut self, entry: FileEntry) {
        self.entries.push(entry);
        self.emit_change();
    }

    /// Remove the entry at `index`.
    ///
    /// Keyed entries are deleted on the backend first and only removed locally
    /// once the backend acknowledges; on failure the list is unchanged.
    /// Entries without a key are removed immediately without a network call.
    pub async fn remove_at<B: UploadBackend>(
        &mut self,
        index: usize,
        backend: &B,
    ) -> Result<FileEntry> {
        let Some(entry) = self.entries.get(index) else {
            return Err(Error::InvalidInput(format!(
                "no file at index {index} (list has {})",
                self.entries.len()
            )));
        };

        if let Some(key) = entry.storage_key() {
            let key = key.to_string();
            backend.delete_file(&key).await?;
            tracing::info!("Deleted stored object {key}");
        }

        let removed = self.entries.remove(index);
        self.emit_change();
        Ok(removed)
    }

    /// Swap in an externally supplied list. Local edits are not merged and
    /// the change callback is not fired.
    pub fn replace(&mut self, entries: Vec<FileEntry>) {
        self.entries = entries;
    }

    fn emit_change(&self) {
        if let Some(callback) = &self.on_change {
            callback(self.entries.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::testing::FakeBackend;

    fn entry(n: usize) -> FileEntry {
        FileEntry::new(format!("cp_{n}clip.mp4"), format!("https://cdn/{n}"), n)
    }

    fn recording(controller: &mut FileListController) -> Arc<Mutex<Vec<Vec<FileEntry>>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        controller.on_change(move |list| sink.lock().unwrap().push(list));
        changes
    }

    #[tokio::test]
    async fn remove_at_preserves_relative_order() {
        let mut controller = FileListController::default();
        for n in 0..5 {
            controller.append(entry(n));
        }

        let backend = FakeBackend::new("tok");
        let removed = controller.remove_at(2, &backend).await.unwrap();

        assert_eq!(removed, entry(2));
        assert_eq!(
            controller.entries(),
            &[entry(0), entry(1), entry(3), entry(4)]
        );
    }

    #[tokio::test]
    async fn keyed_entry_issues_exactly_one_delete() {
        let mut controller = FileListController::new(vec![entry(0)]);
        let backend = FakeBackend::new("tok");

        controller.remove_at(0, &backend).await.unwrap();
        assert_eq!(backend.delete_calls(), vec!["cp_0clip.mp4".to_string()]);
        assert!(controller.is_empty());
        assert!(!controller.is_full(1));
    }

    #[tokio::test]
    async fn unkeyed_entry_is_removed_without_network_call() {
        let mut controller =
            FileListController::new(vec![FileEntry::unkeyed("https://legacy/a", 0)]);
        let backend = FakeBackend::new("tok");

        controller.remove_at(0, &backend).await.unwrap();
        assert!(backend.delete_calls().is_empty());
        assert!(controller.is_empty());
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let mut controller = FileListController::new(vec![entry(0), entry(1)]);
        let changes = recording(&mut controller);
        let backend = FakeBackend::new("tok").failing_deletes();

        assert!(controller.remove_at(1, &backend).await.is_err());
        assert_eq!(controller.entries(), &[entry(0), entry(1)]);
        assert!(changes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_index_is_rejected() {
        let mut controller = FileListController::new(vec![entry(0)]);
        let backend = FakeBackend::new("tok");
        assert!(matches!(
            controller.remove_at(3, &backend).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(backend.delete_calls().is_empty());
    }

    #[tokio::test]
    async fn change_callback_receives_copies_on_mutation_only() {
        let mut controller = FileListController::default();
        let changes = recording(&mut controller);

        controller.append(entry(0));
        controller.append(entry(1));
        controller.replace(vec![entry(7)]);
        controller
            .remove_at(0, &FakeBackend::new("tok"))
            .await
            .unwrap();

        let changes = changes.lock().unwrap();
        assert_eq!(
            *changes,
            vec![vec![entry(0)], vec![entry(0), entry(1)], Vec::new()]
        );
    }
}
