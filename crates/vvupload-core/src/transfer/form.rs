//! Form upload to the object-storage upload host.
//!
//! The file is streamed as the `file` part of a multipart POST next to the
//! `token` and `key` fields. Progress is reported as chunks are handed to the
//! HTTP body, so the last report always equals the file size.

use futures::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;

use super::{ProgressSender, TransferRequest, Transport};
use crate::config::UploaderConfig;
use crate::request::{RequestClient, RequestOptions};
use crate::Result;

/// [`Transport`] speaking the storage host's form-upload protocol.
#[derive(Debug, Clone)]
pub struct FormUploadTransport {
    request: RequestClient,
    upload_host: String,
    chunk_size: usize,
}

impl FormUploadTransport {
    pub fn new(config: &UploaderConfig, request: RequestClient) -> Self {
        Self {
            request,
            upload_host: config.upload_host.clone(),
            chunk_size: config.chunk_size,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadReceipt {
    #[serde(default)]
    key: Option<String>,
}

impl Transport for FormUploadTransport {
    async fn send(&self, request: &TransferRequest, progress: ProgressSender) -> Result<String> {
        let size = request.file.size;
        let mut loaded = 0u64;
        let stream = request
            .file
            .byte_stream(self.chunk_size)
            .await?
            .inspect_ok(move |chunk| {
                loaded += chunk.len() as u64;
                progress.report(loaded, size);
            });

        let part = Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(request.file.name.clone())
            .mime_str(&request.file.mime)?;
        let form = Form::new()
            .text("token", request.token.clone())
            .text("key", request.key.clone())
            .part("file", part);

        tracing::debug!("Uploading {} ({size} bytes) as {}", request.file.name, request.key);
        let receipt: UploadReceipt = self
            .request
            .request(&self.upload_host, RequestOptions::post_form(form))
            .await?
            .into_json()?;

        Ok(receipt
            .key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| request.key.clone()))
    }
}
