//! Shared utility functions used across multiple modules.

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Join an endpoint onto a base URL unless it is already absolute.
pub fn join_url(base: Option<&str>, endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if is_http_url(endpoint) {
        return endpoint.to_string();
    }
    match base {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        ),
        None => endpoint.to_string(),
    }
}

/// Render a byte count as `"x.xx M"` from one MiB up, `"x.xx KB"` below.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes / MIB >= 1.0 {
        format!("{:.2} M", bytes / MIB)
    } else {
        format!("{:.2} KB", bytes / KIB)
    }
}

/// Render a per-tick byte delta the same way as [`format_size`], suffixed `/S`.
pub fn format_rate(bytes: u64) -> String {
    format!("{}/S", format_size(bytes))
}
