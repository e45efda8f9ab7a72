//! Upload transfers.
//!
//! A [`Transfer`] describes one upload (file, object key, token) and can be
//! subscribed to any number of times. Each [`Subscription`] runs the upload in
//! a spawned task and delivers [`TransferEvent`]s in emission order. Dropping
//! the subscription aborts the task, which is how uploads are paused.
//!
//! Whether a later subscription continues where the previous one stopped is
//! up to the [`Transport`]. Form uploads restart from the first byte under
//! the same key and token.

mod form;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{ProgressTotal, UploadFile};
use crate::Result;

pub use form::FormUploadTransport;

/// Event emitted by a running transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    Progress(ProgressTotal),
    /// Upload stored; carries the key reported by the storage host.
    Complete { key: String },
    Error(String),
}

/// Everything a transport needs to upload one file.
#[derive(Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub file: UploadFile,
    pub key: String,
    pub token: String,
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransferRequest")
            .field("file", &self.file.name)
            .field("key", &self.key)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Progress reporting handle given to a transport.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    events: mpsc::UnboundedSender<TransferEvent>,
}

impl ProgressSender {
    /// Report cumulative bytes sent out of `size`.
    pub fn report(&self, loaded: u64, size: u64) {
        // The receiver is gone once the subscription is dropped.
        let _ = self
            .events
            .send(TransferEvent::Progress(ProgressTotal::new(loaded, size)));
    }
}

/// Moves file bytes to object storage.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Upload `request.file` under `request.key`, reporting progress as bytes
    /// leave. Resolves to the key the storage host recorded.
    fn send(
        &self,
        request: &TransferRequest,
        progress: ProgressSender,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Whether a new `send` for the same request continues from the bytes
    /// already stored. When `false`, every `send` starts from byte 0.
    fn resumes_from_offset(&self) -> bool {
        false
    }
}

/// A restartable upload: subscribe to start byte flow, drop the subscription
/// to stop it.
#[derive(Debug, Clone)]
pub struct Transfer<T> {
    transport: T,
    request: Arc<TransferRequest>,
}

impl<T: Transport> Transfer<T> {
    pub fn new(transport: T, request: TransferRequest) -> Self {
        Self {
            transport,
            request: Arc::new(request),
        }
    }

    pub fn key(&self) -> &str {
        &self.request.key
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn resumes_from_offset(&self) -> bool {
        self.transport.resumes_from_offset()
    }

    /// Start (or restart) the upload in a background task.
    pub fn subscribe(&self) -> Subscription {
        let (events, receiver) = mpsc::unbounded_channel();
        let transport = self.transport.clone();
        let request = Arc::clone(&self.request);

        let task = tokio::spawn(async move {
            let progress = ProgressSender {
                events: events.clone(),
            };
            let outcome = match transport.send(&request, progress).await {
                Ok(key) => TransferEvent::Complete { key },
                Err(error) => TransferEvent::Error(error.to_string()),
            };
            let _ = events.send(outcome);
        });

        Subscription {
            events: receiver,
            task,
        }
    }
}

/// Live byte flow of a transfer. Dropping it aborts the upload task.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<TransferEvent>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Next event, or `None` once the task ended and all events were read.
    ///
    /// Cancel-safe: no event is lost if the returned future is dropped.
    pub async fn next_event(&mut self) -> Option<TransferEvent> {
        self.events.recv().await
    }

    /// Stop the upload.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
