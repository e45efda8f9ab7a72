use std::path::Path;

use vvupload_core::backend::UploadBackend;

use crate::commands::common::{http_backend, load_uploader_config, normalize_key};
use crate::error::CliError;

pub async fn run_delete(key: &str, config_path: Option<&Path>) -> Result<(), CliError> {
    let key = normalize_key(key)?;
    let config = load_uploader_config(config_path)?;
    let backend = http_backend(&config)?;

    backend.delete_file(&key).await?;
    println!("{key}");
    Ok(())
}
