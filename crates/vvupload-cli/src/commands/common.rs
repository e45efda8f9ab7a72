use std::path::Path;
use std::sync::Arc;

use vvupload_core::backend::HttpBackend;
use vvupload_core::config::UploaderConfig;
use vvupload_core::request::RequestClient;

use crate::config_file::{load_from_path, resolve_config_path};
use crate::console::ConsoleNotifier;
use crate::error::CliError;

/// Config file values with `VVUPLOAD_*` environment overrides applied.
pub fn load_uploader_config(config_path: Option<&Path>) -> Result<UploaderConfig, CliError> {
    let path = resolve_config_path(config_path).map_err(CliError::Config)?;
    let mut config = load_from_path(&path).map_err(CliError::Config)?;
    config.apply_env()?;
    Ok(config)
}

pub fn http_backend(config: &UploaderConfig) -> Result<HttpBackend, CliError> {
    let request = RequestClient::new(Arc::new(ConsoleNotifier))?;
    Ok(HttpBackend::new(config, request))
}

pub fn normalize_key(key: &str) -> Result<String, CliError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::EmptyKey);
    }
    Ok(key.to_string())
}

/// Show the first few characters of a token and hide the rest.
pub fn redact_token(token: &str) -> String {
    const VISIBLE: usize = 6;
    let visible: String = token.chars().take(VISIBLE).collect();
    if token.chars().count() <= VISIBLE {
        "*".repeat(visible.chars().count())
    } else {
        format!("{visible}...")
    }
}
