//! Upload progress model

use serde::{Deserialize, Serialize};

use crate::util::{format_rate, format_size};

/// Cumulative totals reported by a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressTotal {
    /// Bytes sent so far.
    pub loaded: u64,
    /// Total bytes of the file.
    pub size: u64,
    /// Percent complete (0-100).
    pub percent: f64,
}

impl ProgressTotal {
    #[allow(clippy::cast_precision_loss)]
    pub fn new(loaded: u64, size: u64) -> Self {
        let percent = if size == 0 {
            100.0
        } else {
            (loaded as f64 / size as f64 * 100.0).min(100.0)
        };
        Self {
            loaded,
            size,
            percent,
        }
    }
}

/// Progress state of the live upload session, replaced whole on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub uploaded_bytes: u64,
    pub total_bytes: u64,
    pub percent: f64,
    /// Bytes transferred since the previous tick.
    pub transfer_rate: u64,
}

impl UploadProgress {
    /// Next progress value given the previous cumulative byte count.
    pub const fn from_tick(total: ProgressTotal, previous_loaded: u64) -> Self {
        Self {
            uploaded_bytes: total.loaded,
            total_bytes: total.size,
            percent: total.percent,
            transfer_rate: total.loaded.saturating_sub(previous_loaded),
        }
    }

    /// One-line rendering: percent, sizes and rate.
    pub fn display_line(&self) -> String {
        format!(
            "{:.2}%  {} / {}  {}",
            self.percent,
            format_size(self.uploaded_bytes),
            format_size(self.total_bytes),
            format_rate(self.transfer_rate)
        )
    }
}
