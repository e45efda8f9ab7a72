//! Persistent uploader configuration for the CLI.

use std::path::{Path, PathBuf};

use vvupload_core::config::UploaderConfig;

const CONFIG_DIR_NAME: &str = "vvupload";
const CONFIG_FILE_NAME: &str = "config.json";

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, String> {
    explicit.map_or_else(default_config_path, |path| Ok(path.to_path_buf()))
}

/// Read the config file, falling back to defaults when it does not exist.
pub fn load_from_path(path: &Path) -> Result<UploaderConfig, String> {
    if !path.exists() {
        return Ok(UploaderConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
    serde_json::from_str::<UploaderConfig>(&raw)
        .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))
}

pub fn save_to_path(config: &UploaderConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }

    let serialized = serde_json::to_string_pretty(config)
        .map_err(|error| format!("Failed to serialize config: {error}"))?;
    std::fs::write(path, serialized)
        .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
}
