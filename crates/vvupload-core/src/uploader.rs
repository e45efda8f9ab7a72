//! The uploader: one upload slot plus the committed file list.
//!
//! [`Uploader`] is driven by its owner through `&mut self` methods. Transfer
//! tasks and URL resolutions run in the background and report back through
//! channels; their results are applied when the owner awaits
//! [`Uploader::next_event`].

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::backend::{public_object_url, HttpBackend, ResolvedUrl, UploadBackend};
use crate::config::UploaderConfig;
use crate::list::FileListController;
use crate::models::{FileEntry, UploadFile, UploadProgress};
use crate::notify::{Notice, SharedNotifier};
use crate::request::RequestClient;
use crate::session::{object_key, SessionId, SessionStatus, UploadSession};
use crate::transfer::{FormUploadTransport, Transfer, TransferEvent, TransferRequest, Transport};
use crate::util::{compact_text, unix_millis_now};
use crate::validate::{validate, DurationProbe};
use crate::{Error, Result};

/// Uploader wired to the managed backend and the form-upload host.
pub type HttpUploader = Uploader<HttpBackend, FormUploadTransport>;

/// Something the owner should know about after [`Uploader::next_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Progress(UploadProgress),
    /// Bytes are stored; the key is being resolved to a signed URL.
    TransferComplete { key: String },
    /// The upload was appended to the list.
    Committed(FileEntry),
    /// A stored object was not committed: its resolution failed or arrived
    /// after the session that issued it was gone.
    Discarded { key: String },
    Failed { message: String },
}

/// Point-in-time view of the upload slot, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub progress: Option<UploadProgress>,
    pub key: Option<String>,
    pub file_name: Option<String>,
    pub loading: bool,
    pub can_add: bool,
}

#[derive(Debug)]
struct Resolution {
    session_id: SessionId,
    key: String,
    index: usize,
    result: Result<ResolvedUrl>,
}

enum Wake {
    Transfer(Option<TransferEvent>),
    Resolution(Option<Resolution>),
}

pub struct Uploader<B, T> {
    config: UploaderConfig,
    backend: B,
    transport: T,
    notifier: SharedNotifier,
    probe: Option<Arc<dyn DurationProbe>>,
    list: FileListController,
    session: Option<UploadSession<T>>,
    loading: bool,
    last_outcome: Option<SessionStatus>,
    resolution_tx: mpsc::UnboundedSender<Resolution>,
    resolution_rx: mpsc::UnboundedReceiver<Resolution>,
    pending_resolutions: usize,
}

impl<B, T> std::fmt::Debug for Uploader<B, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("config", &self.config)
            .field("list", &self.list)
            .field("session", &self.session.is_some())
            .field("loading", &self.loading)
            .field("last_outcome", &self.last_outcome)
            .field("pending_resolutions", &self.pending_resolutions)
            .finish_non_exhaustive()
    }
}

impl HttpUploader {
    /// Build an uploader over HTTP, sharing one cookie-aware client between
    /// the backend and the upload host.
    pub fn http(config: UploaderConfig, notifier: SharedNotifier) -> Result<Self> {
        let request = RequestClient::new(Arc::clone(&notifier))?;
        let backend = HttpBackend::new(&config, request.clone());
        let transport = FormUploadTransport::new(&config, request);
        Ok(Self::new(config, backend, transport, notifier))
    }
}

impl<B: UploadBackend, T: Transport> Uploader<B, T> {
    pub fn new(config: UploaderConfig, backend: B, transport: T, notifier: SharedNotifier) -> Self {
        let (resolution_tx, resolution_rx) = mpsc::unbounded_channel();
        Self {
            config,
            backend,
            transport,
            notifier,
            probe: None,
            list: FileListController::default(),
            session: None,
            loading: false,
            last_outcome: None,
            resolution_tx,
            resolution_rx,
            pending_resolutions: 0,
        }
    }

    #[must_use]
    pub fn with_duration_probe(mut self, probe: Arc<dyn DurationProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    #[must_use]
    pub fn with_initial_list(mut self, entries: Vec<FileEntry>) -> Self {
        self.list.replace(entries);
        self
    }

    /// Register the callback fired with a copy of the list after each
    /// commit or removal.
    pub fn on_change(&mut self, callback: impl Fn(Vec<FileEntry>) + Send + Sync + 'static) {
        self.list.on_change(callback);
    }

    pub const fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn entries(&self) -> &[FileEntry] {
        self.list.entries()
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// How the most recent session ended, if one has ended.
    pub const fn last_outcome(&self) -> Option<SessionStatus> {
        self.last_outcome
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self
                .session
                .as_ref()
                .map_or(SessionStatus::Idle, UploadSession::status),
            progress: self.session.as_ref().map(UploadSession::progress),
            key: self.session.as_ref().map(|session| session.key().to_string()),
            file_name: self
                .session
                .as_ref()
                .map(|session| session.file_name().to_string()),
            loading: self.loading,
            can_add: self.session.is_none() && !self.list.is_full(self.config.max_num),
        }
    }

    /// Validate `file`, fetch a token, and start uploading it.
    ///
    /// Rejections are surfaced through the notifier and returned; the slot
    /// stays empty in every failure case.
    pub async fn select_file(&mut self, file: UploadFile) -> Result<()> {
        if self.session.is_some() {
            return Err(Error::SessionActive);
        }
        if self.list.is_full(self.config.max_num) {
            return Err(Error::LimitReached(self.config.max_num));
        }

        tracing::debug!("{}: {}", SessionStatus::Validating, file.name);
        if let Err(error) = validate(&self.config, &file, self.probe.as_deref()).await {
            let notice = match &error {
                Error::Validation(reason) => {
                    Notice::error(reason.notice()).with_description(reason.to_string())
                }
                other => Notice::error("Could not check the file").with_description(other.to_string()),
            };
            self.notifier.notify(notice);
            return Err(error);
        }

        self.loading = true;
        tracing::debug!("{}: {}", SessionStatus::TokenPending, file.name);
        let token = match self.backend.upload_token().await {
            Ok(token) => token,
            Err(error) => {
                tracing::warn!("Failed to obtain an upload token: {error}");
                self.notifier.notify(
                    Notice::error("Failed to obtain an upload token")
                        .with_description(error.to_string()),
                );
                self.loading = false;
                self.last_outcome = Some(SessionStatus::Failed);
                return Err(error);
            }
        };

        let key = object_key(&self.config.key_prefix, unix_millis_now(), &file.name);
        let index = self.list.len();
        tracing::info!("Uploading {} as {key}", file.name);
        let transfer = Transfer::new(
            self.transport.clone(),
            TransferRequest { file, key, token },
        );
        self.session = Some(UploadSession::start(transfer, index));
        self.last_outcome = None;
        Ok(())
    }

    /// Wait for the next transfer event or resolution result and apply it.
    ///
    /// Returns `None` when nothing is in flight. Cancel-safe.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            let subscribed = self
                .session
                .as_ref()
                .is_some_and(UploadSession::is_subscribed);
            let awaiting = self.pending_resolutions > 0;
            if !subscribed && !awaiting {
                return None;
            }

            let wake = tokio::select! {
                event = next_transfer_event(&mut self.session), if subscribed => Wake::Transfer(event),
                resolution = self.resolution_rx.recv(), if awaiting => Wake::Resolution(resolution),
            };

            match wake {
                Wake::Transfer(event) => return Some(self.apply_transfer_event(event)),
                Wake::Resolution(Some(resolution)) => {
                    self.pending_resolutions = self.pending_resolutions.saturating_sub(1);
                    return Some(self.apply_resolution(resolution));
                }
                Wake::Resolution(None) => self.pending_resolutions = 0,
            }
        }
    }

    pub fn pause(&mut self) -> Result<bool> {
        Ok(self.live_session()?.pause())
    }

    pub fn resume(&mut self) -> Result<bool> {
        Ok(self.live_session()?.resume())
    }

    pub fn toggle_pause(&mut self) -> Result<SessionStatus> {
        Ok(self.live_session()?.toggle())
    }

    /// Abandon the live session. Returns `false` when the slot was empty.
    ///
    /// A resolution already issued keeps running; its result is discarded.
    pub fn cancel(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.pause();
        tracing::info!("Cancelled upload {}", session.key());
        self.loading = false;
        self.last_outcome = Some(SessionStatus::Cancelled);
        true
    }

    /// Remove a committed entry, deleting its stored object when keyed.
    pub async fn remove_at(&mut self, index: usize) -> Result<FileEntry> {
        self.list.remove_at(index, &self.backend).await
    }

    /// Replace the committed list from outside. Does not fire `on_change`.
    pub fn replace_list(&mut self, entries: Vec<FileEntry>) {
        self.list.replace(entries);
    }

    fn live_session(&mut self) -> Result<&mut UploadSession<T>> {
        self.session.as_mut().ok_or(Error::NoActiveUpload)
    }

    fn apply_transfer_event(&mut self, event: Option<TransferEvent>) -> SessionEvent {
        let Some(session) = self.session.as_mut() else {
            return SessionEvent::Failed {
                message: Error::NoActiveUpload.to_string(),
            };
        };

        match event {
            Some(TransferEvent::Progress(total)) => SessionEvent::Progress(session.apply_progress(total)),
            Some(TransferEvent::Complete { key }) => self.on_transfer_complete(key),
            Some(TransferEvent::Error(message)) => self.fail(message),
            None => self.fail("transfer ended without a result".to_string()),
        }
    }

    fn on_transfer_complete(&mut self, key: String) -> SessionEvent {
        let Some(session) = self.session.as_mut() else {
            return SessionEvent::Discarded { key };
        };
        session.mark_completed();
        tracing::debug!("{}: {key}", SessionStatus::Completed);

        if !self.config.is_private {
            let index = session.index();
            return match public_object_url(&self.config.public_domain, &key) {
                Some(url) => self.commit(FileEntry::new(key, url, index)),
                None => self.fail(format!("storage returned an unusable key {key:?}")),
            };
        }

        let resolution_tx = self.resolution_tx.clone();
        let backend = self.backend.clone();
        let session_id = session.id();
        let index = session.index();
        let expire_in_secs = self.config.time_limit_secs;
        let resolved_key = key.clone();
        tokio::spawn(async move {
            let result = backend.resolve_url(&resolved_key, expire_in_secs).await;
            let _ = resolution_tx.send(Resolution {
                session_id,
                key: resolved_key,
                index,
                result,
            });
        });
        self.pending_resolutions += 1;
        SessionEvent::TransferComplete { key }
    }

    fn apply_resolution(&mut self, resolution: Resolution) -> SessionEvent {
        let Resolution {
            session_id,
            key,
            index,
            result,
        } = resolution;

        let is_live = self
            .session
            .as_ref()
            .is_some_and(|session| session.id() == session_id);
        if !is_live {
            tracing::warn!("Discarding stale resolution for {key}");
            return SessionEvent::Discarded { key };
        }

        match result {
            Ok(resolved) => {
                self.commit(FileEntry::new(key, resolved.url, index).with_preview_url(resolved.preview_url))
            }
            Err(error) => {
                tracing::warn!("Could not resolve {key}, object left unreferenced: {error}");
                self.session = None;
                self.loading = false;
                self.last_outcome = Some(SessionStatus::Failed);
                SessionEvent::Discarded { key }
            }
        }
    }

    fn commit(&mut self, entry: FileEntry) -> SessionEvent {
        tracing::info!("Committed {} at {}", entry.url, entry.index);
        self.session = None;
        self.loading = false;
        self.last_outcome = Some(SessionStatus::Completed);
        self.list.append(entry.clone());
        SessionEvent::Committed(entry)
    }

    fn fail(&mut self, message: String) -> SessionEvent {
        tracing::warn!("Upload failed: {message}");
        self.notifier
            .notify(Notice::error("Upload failed").with_description(compact_text(&message)));
        self.session = None;
        self.loading = false;
        self.last_outcome = Some(SessionStatus::Failed);
        SessionEvent::Failed { message }
    }
}

async fn next_transfer_event<T: Transport>(
    session: &mut Option<UploadSession<T>>,
) -> Option<TransferEvent> {
    session.as_mut()?.next_transfer_event().await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::notify::MemoryNotifier;
    use crate::transfer::testing::{Script, ScriptedTransport};
    use crate::validate::testing::FixedProbe;
    use crate::ValidationError;

    type TestUploader = Uploader<FakeBackend, ScriptedTransport>;

    fn uploader(
        config: UploaderConfig,
        backend: &FakeBackend,
        transport: &ScriptedTransport,
    ) -> (TestUploader, MemoryNotifier) {
        let notifier = MemoryNotifier::new();
        let uploader = Uploader::new(
            config,
            backend.clone(),
            transport.clone(),
            Arc::new(notifier.clone()),
        );
        (uploader, notifier)
    }

    fn clip(size: usize) -> UploadFile {
        UploadFile::from_bytes("clip.mp4", vec![0u8; size], None)
    }

    async fn drain(uploader: &mut TestUploader) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(event) = uploader.next_event().await {
            events.push(event);
        }
        events
    }

    fn rates(events: &[SessionEvent]) -> Vec<u64> {
        events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Progress(progress) => Some(progress.transfer_rate),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_before_any_network_call() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Complete(vec![]));
        let config = UploaderConfig {
            size_mb: Some(5.0),
            ..UploaderConfig::default()
        };
        let (mut uploader, notifier) = uploader(config, &backend, &transport);

        let error = uploader.select_file(clip(10 * 1024 * 1024)).await.unwrap_err();

        assert!(matches!(
            error,
            Error::Validation(ValidationError::SizeExceeded { .. })
        ));
        assert_eq!(backend.token_calls(), 0);
        assert!(transport.sent_keys().is_empty());
        assert_eq!(uploader.snapshot().status, SessionStatus::Idle);
        assert!(!uploader.is_loading());
        assert_eq!(notifier.errors(), vec!["File exceeds the size limit"]);
    }

    #[tokio::test]
    async fn long_video_is_rejected_after_probe() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Complete(vec![]));
        let config = UploaderConfig {
            limit_duration_secs: Some(60.0),
            ..UploaderConfig::default()
        };
        let (uploader, notifier) = uploader(config, &backend, &transport);
        let probe = FixedProbe::new(90.0);
        let mut uploader = uploader.with_duration_probe(Arc::new(probe.clone()));

        assert!(uploader.select_file(clip(100)).await.is_err());
        assert_eq!(probe.calls(), 1);
        assert_eq!(backend.token_calls(), 0);
        assert_eq!(notifier.errors(), vec!["Video exceeds the duration limit"]);
    }

    #[tokio::test]
    async fn private_upload_resolves_key_once_and_commits() {
        let backend = FakeBackend::new("tok").resolving_to(ResolvedUrl {
            url: "https://signed.example.com/clip.mp4?e=1".to_string(),
            preview_url: Some("https://signed.example.com/clip.jpg".to_string()),
        });
        let transport = ScriptedTransport::new(Script::Complete(vec![400, 1000]));
        let (mut uploader, _) = uploader(UploaderConfig::default(), &backend, &transport);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        uploader.on_change(move |list| sink.lock().unwrap().push(list));

        uploader.select_file(clip(1000)).await.unwrap();
        let key = uploader.snapshot().key.unwrap();
        assert!(key.starts_with("cp_"));
        assert!(key.ends_with("clip.mp4"));
        assert!(uploader.is_loading());

        let events = drain(&mut uploader).await;

        assert_eq!(rates(&events), vec![400, 600]);
        let expected = FileEntry::new(key.clone(), "https://signed.example.com/clip.mp4?e=1", 0)
            .with_preview_url(Some("https://signed.example.com/clip.jpg".to_string()));
        assert_eq!(
            events[2..].to_vec(),
            vec![
                SessionEvent::TransferComplete { key: key.clone() },
                SessionEvent::Committed(expected.clone()),
            ]
        );
        assert_eq!(backend.resolve_calls(), vec![(key, 86_400)]);
        assert_eq!(uploader.entries(), &[expected.clone()]);
        assert_eq!(*changes.lock().unwrap(), vec![vec![expected]]);
        assert_eq!(uploader.last_outcome(), Some(SessionStatus::Completed));
        assert!(!uploader.is_loading());
    }

    #[tokio::test]
    async fn public_upload_commits_without_resolution() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Complete(vec![1000]));
        let config = UploaderConfig {
            is_private: false,
            public_domain: "http://cdn.example.com".to_string(),
            ..UploaderConfig::default()
        };
        let (mut uploader, _) = uploader(config, &backend, &transport);

        uploader.select_file(clip(1000)).await.unwrap();
        let key = uploader.snapshot().key.unwrap();
        let events = drain(&mut uploader).await;

        assert_eq!(
            events.last(),
            Some(&SessionEvent::Committed(FileEntry::new(
                key.clone(),
                format!("http://cdn.example.com/{key}"),
                0
            )))
        );
        assert!(backend.resolve_calls().is_empty());
    }

    #[tokio::test]
    async fn pause_and_resume_keep_progress_and_key() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Stall(vec![400])).resuming();
        let (mut uploader, _) = uploader(UploaderConfig::default(), &backend, &transport);

        uploader.select_file(clip(1000)).await.unwrap();
        assert!(matches!(
            uploader.next_event().await,
            Some(SessionEvent::Progress(_))
        ));

        assert!(uploader.pause().unwrap());
        assert!(!uploader.pause().unwrap());
        let paused = uploader.snapshot();
        assert_eq!(paused.status, SessionStatus::Paused);
        assert_eq!(paused.progress.unwrap().uploaded_bytes, 400);
        assert_eq!(uploader.next_event().await, None);

        transport.set_script(Script::Complete(vec![400, 1000]));
        assert_eq!(uploader.toggle_pause().unwrap(), SessionStatus::Uploading);
        assert_eq!(uploader.snapshot().progress.unwrap().uploaded_bytes, 400);

        let events = drain(&mut uploader).await;
        assert_eq!(rates(&events), vec![0, 600]);
        let sent = transport.sent_keys();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(uploader.entries().len(), 1);
    }

    #[tokio::test]
    async fn resolution_after_cancel_is_discarded() {
        let (backend, gate) = FakeBackend::new("tok").gated();
        let transport = ScriptedTransport::new(Script::Complete(vec![1000]));
        let config = UploaderConfig {
            max_num: 2,
            ..UploaderConfig::default()
        };
        let (mut uploader, _) = uploader(config, &backend, &transport);

        uploader.select_file(clip(1000)).await.unwrap();
        let first_key = uploader.snapshot().key.unwrap();
        assert!(matches!(
            uploader.next_event().await,
            Some(SessionEvent::Progress(_))
        ));
        assert_eq!(
            uploader.next_event().await,
            Some(SessionEvent::TransferComplete {
                key: first_key.clone()
            })
        );

        assert!(uploader.cancel());
        assert_eq!(uploader.last_outcome(), Some(SessionStatus::Cancelled));

        transport.set_script(Script::Stall(vec![]));
        uploader.select_file(clip(1000)).await.unwrap();
        gate.notify_one();

        assert_eq!(
            uploader.next_event().await,
            Some(SessionEvent::Discarded { key: first_key })
        );
        assert!(uploader.entries().is_empty());
        assert_eq!(uploader.snapshot().status, SessionStatus::Uploading);
    }

    #[tokio::test]
    async fn failed_resolution_discards_the_upload() {
        let backend = FakeBackend::new("tok").failing_resolution();
        let transport = ScriptedTransport::new(Script::Complete(vec![1000]));
        let (mut uploader, _) = uploader(UploaderConfig::default(), &backend, &transport);

        uploader.select_file(clip(1000)).await.unwrap();
        let key = uploader.snapshot().key.unwrap();
        let events = drain(&mut uploader).await;

        assert_eq!(events.last(), Some(&SessionEvent::Discarded { key }));
        assert!(uploader.entries().is_empty());
        assert_eq!(uploader.last_outcome(), Some(SessionStatus::Failed));
        assert!(uploader.snapshot().can_add);
    }

    #[tokio::test]
    async fn token_failure_clears_the_slot() {
        let backend = FakeBackend::without_token();
        let transport = ScriptedTransport::new(Script::Complete(vec![]));
        let (mut uploader, notifier) = uploader(UploaderConfig::default(), &backend, &transport);

        assert!(matches!(
            uploader.select_file(clip(10)).await,
            Err(Error::Api { .. })
        ));
        assert_eq!(backend.token_calls(), 1);
        assert!(transport.sent_keys().is_empty());
        assert_eq!(uploader.snapshot().status, SessionStatus::Idle);
        assert!(!uploader.is_loading());
        assert_eq!(uploader.last_outcome(), Some(SessionStatus::Failed));
        assert_eq!(notifier.errors(), vec!["Failed to obtain an upload token"]);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_upload_failed() {
        let backend = FakeBackend::new("tok");
        let transport =
            ScriptedTransport::new(Script::Fail(vec![100], "connection reset".to_string()));
        let (mut uploader, notifier) = uploader(UploaderConfig::default(), &backend, &transport);

        uploader.select_file(clip(1000)).await.unwrap();
        let events = drain(&mut uploader).await;

        match events.last() {
            Some(SessionEvent::Failed { message }) => assert!(message.contains("connection reset")),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(notifier.errors(), vec!["Upload failed"]);
        assert_eq!(uploader.snapshot().status, SessionStatus::Idle);
        assert_eq!(uploader.last_outcome(), Some(SessionStatus::Failed));
        assert!(uploader.entries().is_empty());
    }

    #[tokio::test]
    async fn second_selection_while_uploading_is_rejected() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Stall(vec![]));
        let config = UploaderConfig {
            max_num: 3,
            ..UploaderConfig::default()
        };
        let (mut uploader, _) = uploader(config, &backend, &transport);

        uploader.select_file(clip(10)).await.unwrap();
        assert!(matches!(
            uploader.select_file(clip(10)).await,
            Err(Error::SessionActive)
        ));
        assert_eq!(backend.token_calls(), 1);
        assert!(!uploader.snapshot().can_add);
    }

    #[tokio::test]
    async fn full_list_rejects_new_selection() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Complete(vec![]));
        let (uploader, _) = uploader(UploaderConfig::default(), &backend, &transport);
        let mut uploader =
            uploader.with_initial_list(vec![FileEntry::new("cp_1a.mp4", "https://cdn/a", 0)]);

        assert!(matches!(
            uploader.select_file(clip(10)).await,
            Err(Error::LimitReached(1))
        ));
        assert_eq!(backend.token_calls(), 0);
        assert!(!uploader.snapshot().can_add);
    }

    #[tokio::test]
    async fn controls_without_a_session_report_no_active_upload() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Complete(vec![]));
        let (mut uploader, _) = uploader(UploaderConfig::default(), &backend, &transport);

        assert!(matches!(uploader.pause(), Err(Error::NoActiveUpload)));
        assert!(matches!(uploader.resume(), Err(Error::NoActiveUpload)));
        assert!(!uploader.cancel());
        assert_eq!(uploader.next_event().await, None);
    }

    #[tokio::test]
    async fn remove_at_deletes_committed_upload() {
        let backend = FakeBackend::new("tok");
        let transport = ScriptedTransport::new(Script::Complete(vec![]));
        let (uploader, _) = uploader(UploaderConfig::default(), &backend, &transport);
        let mut uploader =
            uploader.with_initial_list(vec![FileEntry::new("cp_1a.mp4", "https://cdn/a", 0)]);

        uploader.remove_at(0).await.unwrap();
        assert_eq!(backend.delete_calls(), vec!["cp_1a.mp4".to_string()]);
        assert!(uploader.snapshot().can_add);
    }
}
