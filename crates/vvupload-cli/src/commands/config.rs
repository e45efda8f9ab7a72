use std::path::Path;

use vvupload_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_file::{load_from_path, resolve_config_path, save_to_path};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            upload_host,
            public_domain,
            key_prefix,
            force,
        } => run_config_init(
            config_path,
            ConfigInit {
                api_base_url,
                upload_host,
                public_domain,
                key_prefix,
                force,
            },
        ),
        ConfigCommands::Show => run_config_show(config_path),
    }
}

#[derive(Debug, Default)]
pub struct ConfigInit {
    pub api_base_url: Option<String>,
    pub upload_host: Option<String>,
    pub public_domain: Option<String>,
    pub key_prefix: Option<String>,
    pub force: bool,
}

pub fn run_config_init(config_path: Option<&Path>, init: ConfigInit) -> Result<(), CliError> {
    let path = resolve_config_path(config_path).map_err(CliError::Config)?;
    if path.exists() && !init.force {
        return Err(CliError::ConfigExists(path));
    }

    let mut config = load_from_path(&path).map_err(CliError::Config)?;
    if let Some(api_base_url) = normalize_text_option(init.api_base_url) {
        config.api_base_url = Some(api_base_url);
    }
    if let Some(upload_host) = normalize_text_option(init.upload_host) {
        config.upload_host = upload_host;
    }
    if let Some(public_domain) = normalize_text_option(init.public_domain) {
        config.public_domain = public_domain;
    }
    if let Some(key_prefix) = normalize_text_option(init.key_prefix) {
        config.key_prefix = key_prefix;
    }
    config.validate()?;

    save_to_path(&config, &path).map_err(CliError::Config)?;
    println!("Saved config to {}", path.display());
    Ok(())
}

fn run_config_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path).map_err(CliError::Config)?;
    let mut config = load_from_path(&path).map_err(CliError::Config)?;
    if let Err(error) = config.apply_env() {
        eprintln!("# warning: {error}");
    }
    if path.exists() {
        eprintln!("# {}", path.display());
    } else {
        eprintln!("# {} (not found, showing defaults)", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
