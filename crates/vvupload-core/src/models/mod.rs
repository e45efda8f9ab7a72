//! Data models for vvupload

mod file_entry;
mod progress;
mod upload_file;

pub use file_entry::FileEntry;
pub use progress::{ProgressTotal, UploadProgress};
pub use upload_file::{FileSource, UploadFile};
