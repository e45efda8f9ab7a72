//! Upload session state machine.
//!
//! A session exists from the moment a token is obtained and a transfer is
//! opened until the upload is committed, discarded, failed, or cancelled.
//! It owns the transfer handle and the live subscription, so pausing is
//! dropping the subscription and resuming is subscribing again to the same
//! transfer (same key, same token). When the transport restarts from byte 0,
//! resuming resets progress so it never runs backwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ProgressTotal, UploadProgress};
use crate::transfer::{Subscription, Transfer, TransferEvent, Transport};

/// Lifecycle of the upload slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Validating,
    TokenPending,
    Uploading,
    Paused,
    /// Bytes are stored; waiting for the key to resolve to a URL.
    Completed,
    Failed,
    Cancelled,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::TokenPending => "token pending",
            Self::Uploading => "uploading",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// A unique identifier for an upload session, using UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Object key for a new upload: `<prefix>_<epoch-millis><file name>`.
pub fn object_key(prefix: &str, epoch_millis: i64, file_name: &str) -> String {
    format!("{prefix}_{epoch_millis}{file_name}")
}

/// The single live upload.
#[derive(Debug)]
pub struct UploadSession<T> {
    id: SessionId,
    index: usize,
    status: SessionStatus,
    progress: UploadProgress,
    previous_loaded: u64,
    transfer: Transfer<T>,
    subscription: Option<Subscription>,
}

impl<T: Transport> UploadSession<T> {
    /// Open a session on `transfer` and start byte flow.
    ///
    /// `index` is the committed list length at start, recorded on the entry.
    pub fn start(transfer: Transfer<T>, index: usize) -> Self {
        let subscription = Some(transfer.subscribe());
        let total_bytes = transfer.request().file.size;
        Self {
            id: SessionId::new(),
            index,
            status: SessionStatus::Uploading,
            progress: UploadProgress {
                total_bytes,
                ..UploadProgress::default()
            },
            previous_loaded: 0,
            transfer,
            subscription,
        }
    }

    pub const fn id(&self) -> SessionId {
        self.id
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    pub const fn progress(&self) -> UploadProgress {
        self.progress
    }

    pub fn key(&self) -> &str {
        self.transfer.key()
    }

    pub fn file_name(&self) -> &str {
        &self.transfer.request().file.name
    }

    pub const fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the progress value from a cumulative tick.
    ///
    /// The rate is the byte delta since the previous tick.
    pub fn apply_progress(&mut self, total: ProgressTotal) -> UploadProgress {
        self.progress = UploadProgress::from_tick(total, self.previous_loaded);
        self.previous_loaded = total.loaded;
        self.progress
    }

    /// Stop byte flow. No-op unless uploading.
    pub fn pause(&mut self) -> bool {
        if self.status != SessionStatus::Uploading {
            return false;
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.status = SessionStatus::Paused;
        tracing::debug!("Paused upload {}", self.key());
        true
    }

    /// Resubscribe to the same transfer. No-op unless paused.
    ///
    /// Progress is kept when the transport continues from the stored offset
    /// and reset to zero otherwise.
    pub fn resume(&mut self) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        if !self.transfer.resumes_from_offset() {
            self.previous_loaded = 0;
            self.progress = UploadProgress {
                total_bytes: self.progress.total_bytes,
                ..UploadProgress::default()
            };
        }
        self.subscription = Some(self.transfer.subscribe());
        self.status = SessionStatus::Uploading;
        tracing::debug!("Resumed upload {}", self.key());
        true
    }

    /// Flip between uploading and paused; returns the resulting status.
    pub fn toggle(&mut self) -> SessionStatus {
        match self.status {
            SessionStatus::Uploading => {
                self.pause();
            }
            SessionStatus::Paused => {
                self.resume();
            }
            _ => {}
        }
        self.status
    }

    /// Bytes are stored; release the subscription and wait for resolution.
    pub fn mark_completed(&mut self) {
        self.subscription = None;
        self.status = SessionStatus::Completed;
    }

    /// Next event of the live subscription.
    ///
    /// `None` when not subscribed or when the transfer task ended without
    /// a final event.
    pub async fn next_transfer_event(&mut self) -> Option<TransferEvent> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next_event().await,
            None => None,
        }
    }
}
