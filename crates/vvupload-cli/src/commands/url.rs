use std::path::Path;

use vvupload_core::backend::{public_object_url, UploadBackend};
use vvupload_core::{Error, FileEntry};

use crate::commands::common::{http_backend, load_uploader_config, normalize_key};
use crate::console::format_entry_line;
use crate::error::CliError;

pub async fn run_url(
    key: &str,
    public: bool,
    time_limit: Option<u64>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let key = normalize_key(key)?;
    let config = load_uploader_config(config_path)?;

    let entry = if public || !config.is_private {
        let url = public_object_url(&config.public_domain, &key)
            .ok_or_else(|| Error::InvalidInput(format!("unusable object key {key:?}")))?;
        FileEntry::new(key, url, 0)
    } else {
        let backend = http_backend(&config)?;
        let expire_in_secs = time_limit.unwrap_or(config.time_limit_secs);
        let resolved = backend.resolve_url(&key, expire_in_secs).await?;
        FileEntry::new(key, resolved.url, 0).with_preview_url(resolved.preview_url)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", format_entry_line(&entry));
    }
    Ok(())
}
