//! Backend client for upload tokens, URL resolution, and deletion.
//!
//! All three endpoints answer with a `{ code, msg, data }` envelope where
//! `code == 10000` means success. Backend messages are surfaced through the
//! notifier; callers receive a typed error so that "call failed" stays
//! distinguishable from "nothing found".

use std::future::Future;

use serde::Deserialize;

use crate::config::{UploaderConfig, SUCCESS_CODE};
use crate::notify::{Notice, SharedNotifier};
use crate::request::{RequestClient, RequestOptions};
use crate::util::join_url;
use crate::{Error, Result};

/// A storage key resolved to something a viewer can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: String,
    /// Poster frame for videos, when the backend provides one.
    pub preview_url: Option<String>,
}

/// Backend operations the uploader depends on.
pub trait UploadBackend: Clone + Send + Sync + 'static {
    /// Fetch a fresh upload token.
    fn upload_token(&self) -> impl Future<Output = Result<String>> + Send;

    /// Request a signed URL for `key`, valid for `expire_in_secs`.
    fn resolve_url(
        &self,
        key: &str,
        expire_in_secs: u64,
    ) -> impl Future<Output = Result<ResolvedUrl>> + Send;

    /// Delete the stored object behind `key`.
    fn delete_file(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Build the public URL of an object: `<domain>/<key>`.
pub fn public_object_url(domain: &str, key: &str) -> Option<String> {
    let key = key.trim_matches('/');
    if key.is_empty() {
        return None;
    }
    Some(format!("{}/{key}", domain.trim_end_matches('/')))
}

/// [`UploadBackend`] over the managed REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    request: RequestClient,
    token_url: String,
    file_url: String,
    delete_url: String,
}

impl HttpBackend {
    /// Build a backend client with endpoints taken from `config`.
    pub fn new(config: &UploaderConfig, request: RequestClient) -> Self {
        let base = config.api_base_url.as_deref();
        Self {
            request,
            token_url: join_url(base, &config.token_endpoint),
            file_url: join_url(base, &config.file_url_endpoint),
            delete_url: join_url(base, &config.delete_endpoint),
        }
    }

    fn notifier(&self) -> &SharedNotifier {
        self.request.notifier()
    }
}

impl UploadBackend for HttpBackend {
    async fn upload_token(&self) -> Result<String> {
        let envelope: Envelope<TokenData> = self
            .request
            .request(&self.token_url, RequestOptions::get())
            .await?
            .into_json()?;

        envelope
            .into_data(self.notifier())?
            .map(|data| data.token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::InvalidPayload("response did not include a token".to_string()))
    }

    async fn resolve_url(&self, key: &str, expire_in_secs: u64) -> Result<ResolvedUrl> {
        let body = serde_json::json!({
            "fileKeys": [key],
            "expireInSeconds": expire_in_secs,
        });
        let envelope: Envelope<Vec<ResourceData>> = self
            .request
            .request(&self.file_url, RequestOptions::post_json(body))
            .await?
            .into_json()?;

        let resource = envelope
            .into_data(self.notifier())?
            .and_then(|resources| resources.into_iter().next())
            .ok_or_else(|| {
                Error::InvalidPayload(format!("no resource URL returned for {key}"))
            })?;
        let url = resource
            .resource_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::InvalidPayload(format!("empty resource URL returned for {key}"))
            })?;

        Ok(ResolvedUrl {
            url,
            preview_url: resource.vframe_url.filter(|url| !url.trim().is_empty()),
        })
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        let url = format!(
            "{}/{}",
            self.delete_url.trim_end_matches('/'),
            urlencoding::encode(key)
        );
        let envelope: Envelope<serde_json::Value> = self
            .request
            .request(&url, RequestOptions::delete())
            .await?
            .into_json()?;

        let message = envelope.msg.clone();
        envelope.into_data(self.notifier())?;
        if let Some(message) = message.filter(|message| !message.trim().is_empty()) {
            self.notifier().notify(Notice::success(message));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap a success envelope, or surface the backend message and fail.
    fn into_data(self, notifier: &SharedNotifier) -> Result<Option<T>> {
        if self.code == SUCCESS_CODE {
            return Ok(self.data);
        }

        let message = self
            .msg
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty());
        if let Some(message) = &message {
            notifier.notify(Notice::error(message.clone()));
        }
        Err(Error::Api {
            code: self.code,
            message: message.unwrap_or_else(|| "Unknown backend error".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenData {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceData {
    #[serde(default)]
    resource_url: Option<String>,
    #[serde(default)]
    vframe_url: Option<String>,
}
