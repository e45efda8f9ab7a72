use std::path::Path;

use vvupload_core::backend::UploadBackend;

use crate::commands::common::{http_backend, load_uploader_config, redact_token};
use crate::error::CliError;

pub async fn run_token(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_uploader_config(config_path)?;
    let backend = http_backend(&config)?;

    let token = backend.upload_token().await?;
    println!("Upload token obtained: {}", redact_token(&token));
    Ok(())
}
