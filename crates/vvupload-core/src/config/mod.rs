//! Uploader configuration.
//!
//! Every field has a default matching the managed backend deployment, so an
//! empty JSON object is a valid configuration. Environment overrides are
//! applied through [`UploaderConfig::apply_env`].

use std::env;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const ENV_API_BASE_URL: &str = "VVUPLOAD_API_BASE_URL";
const ENV_UPLOAD_HOST: &str = "VVUPLOAD_UPLOAD_HOST";
const ENV_PUBLIC_DOMAIN: &str = "VVUPLOAD_PUBLIC_DOMAIN";
const ENV_KEY_PREFIX: &str = "VVUPLOAD_KEY_PREFIX";

/// Success code carried in the backend response envelope.
pub const SUCCESS_CODE: i64 = 10000;

pub const DEFAULT_TOKEN_ENDPOINT: &str = "/api/resource/qiniu/getUploadToken";
pub const DEFAULT_FILE_URL_ENDPOINT: &str = "/api/resource/qiniu/getPrivateFiles";
pub const DEFAULT_DELETE_ENDPOINT: &str = "/api/resource/qiniu/delete";
pub const DEFAULT_PUBLIC_DOMAIN: &str = "http://qbe4jmzon.sabkt.gdipper.com";
/// Form-upload host for the south-east Asia storage region.
pub const DEFAULT_UPLOAD_HOST: &str = "https://up-as0.qiniup.com";
pub const DEFAULT_KEY_PREFIX: &str = "cp";
/// Signed URL lifetime: one day.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 86_400;
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Kind of media the uploader accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    #[default]
    Video,
}

/// Consumer-facing uploader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploaderConfig {
    pub media_kind: MediaKind,
    /// Maximum number of committed files.
    pub max_num: usize,
    /// Size ceiling in MB.
    pub size_mb: Option<f64>,
    /// Accepted MIME subtypes (`mp4`, `png`, ...). Empty accepts everything.
    pub accept: Vec<String>,
    /// Resolve uploads to signed URLs instead of public ones.
    pub is_private: bool,
    /// Signed URL expiry in seconds.
    pub time_limit_secs: u64,
    /// Maximum video duration in seconds.
    pub limit_duration_secs: Option<f64>,
    pub api_base_url: Option<String>,
    pub token_endpoint: String,
    pub file_url_endpoint: String,
    pub delete_endpoint: String,
    pub public_domain: String,
    pub upload_host: String,
    pub key_prefix: String,
    pub chunk_size: usize,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            media_kind: MediaKind::default(),
            max_num: 1,
            size_mb: None,
            accept: Vec::new(),
            is_private: true,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            limit_duration_secs: None,
            api_base_url: None,
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            file_url_endpoint: DEFAULT_FILE_URL_ENDPOINT.to_string(),
            delete_endpoint: DEFAULT_DELETE_ENDPOINT.to_string(),
            public_domain: DEFAULT_PUBLIC_DOMAIN.to_string(),
            upload_host: DEFAULT_UPLOAD_HOST.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl UploaderConfig {
    /// Apply `VVUPLOAD_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup, then validate.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = normalize_text_option(lookup(ENV_API_BASE_URL)) {
            self.api_base_url = Some(value);
        }
        if let Some(value) = normalize_text_option(lookup(ENV_UPLOAD_HOST)) {
            self.upload_host = value;
        }
        if let Some(value) = normalize_text_option(lookup(ENV_PUBLIC_DOMAIN)) {
            self.public_domain = value;
        }
        if let Some(value) = normalize_text_option(lookup(ENV_KEY_PREFIX)) {
            self.key_prefix = value;
        }
        self.validate()
    }

    /// Check field ranges and normalize URLs (trailing slashes, whitespace).
    pub fn validate(&mut self) -> Result<()> {
        if self.max_num == 0 {
            return Err(Error::InvalidInput("max_num must be at least 1".to_string()));
        }
        if let Some(size_mb) = self.size_mb {
            if !(size_mb.is_finite() && size_mb > 0.0) {
                return Err(Error::InvalidInput(
                    "size_mb must be a positive number".to_string(),
                ));
            }
        }
        if let Some(limit) = self.limit_duration_secs {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(Error::InvalidInput(
                    "limit_duration_secs must be a positive number".to_string(),
                ));
            }
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidInput(
                "chunk_size must be at least 1 byte".to_string(),
            ));
        }
        if self.key_prefix.trim().is_empty() {
            return Err(Error::InvalidInput("key_prefix must not be empty".to_string()));
        }

        self.api_base_url = match normalize_text_option(self.api_base_url.take()) {
            Some(url) => Some(normalize_http_url(&url, "api_base_url")?),
            None => None,
        };
        self.upload_host = normalize_http_url(&self.upload_host, "upload_host")?;
        self.public_domain = normalize_http_url(&self.public_domain, "public_domain")?;
        if self.api_base_url.is_none() && self.has_relative_endpoint() {
            return Err(Error::InvalidInput(
                "api_base_url is required when endpoints are relative".to_string(),
            ));
        }
        self.accept = self
            .accept
            .iter()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .collect();
        Ok(())
    }

    pub const fn is_video(&self) -> bool {
        matches!(self.media_kind, MediaKind::Video)
    }

    fn has_relative_endpoint(&self) -> bool {
        [
            &self.token_endpoint,
            &self.file_url_endpoint,
            &self.delete_endpoint,
        ]
        .iter()
        .any(|endpoint| !is_http_url(endpoint.trim()))
    }
}

fn normalize_http_url(raw: &str, field: &str) -> Result<String> {
    let value = raw.trim();
    if is_http_url(value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(format!(
            "{field} must include http:// or https://"
        )))
    }
}
