//! Terminal output for notices and upload progress.

use std::io::{self, Write};

use vvupload_core::notify::{Notice, NoticeLevel, Notifier};
use vvupload_core::{FileEntry, UploadProgress};

/// Prints notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(&notice));
    }
}

pub fn format_notice(notice: &Notice) -> String {
    let label = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    match notice.description.as_deref().filter(|text| !text.is_empty()) {
        Some(description) => format!("{label}: {} ({description})", notice.message),
        None => format!("{label}: {}", notice.message),
    }
}

/// Redraw the progress line in place.
pub fn render_progress(file_name: &str, progress: &UploadProgress) {
    let mut stderr = io::stderr();
    let _ = write!(stderr, "\r\x1b[2K{file_name}  {}", progress.display_line());
    let _ = stderr.flush();
}

/// End the in-place progress line.
pub fn finish_progress() {
    eprintln!();
}

pub fn format_entry_line(entry: &FileEntry) -> String {
    let key = entry.key.as_deref().unwrap_or("-");
    match entry.preview_url.as_deref() {
        Some(preview) => format!("{}\t{key}\t{}\t{preview}", entry.index, entry.url),
        None => format!("{}\t{key}\t{}", entry.index, entry.url),
    }
}
