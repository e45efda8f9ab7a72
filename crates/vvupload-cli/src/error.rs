use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vvupload_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Config file already exists at {}. Pass --force to overwrite it.", .0.display())]
    ConfigExists(PathBuf),
    #[error("Object key cannot be empty")]
    EmptyKey,
    #[error("{failed} of {total} uploads did not complete")]
    UploadsIncomplete { failed: usize, total: usize },
}
