use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vvupload_core::config::{MediaKind, UploaderConfig};

#[derive(Parser)]
#[command(name = "vvupload")]
#[command(about = "Upload images and videos to cloud object storage")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload files one after another
    Upload(UploadArgs),
    /// Print the URL of a stored object
    Url {
        /// Object key
        key: String,
        /// Build the public URL instead of requesting a signed one
        #[arg(long)]
        public: bool,
        /// Signed URL lifetime in seconds
        #[arg(long, value_name = "SECS")]
        time_limit: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored object
    #[command(alias = "rm")]
    Delete {
        /// Object key
        key: String,
    },
    /// Check that an upload token can be obtained
    Token,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
    /// Accept images instead of videos
    #[arg(long)]
    pub image: bool,
    /// Commit public URLs instead of signed ones
    #[arg(long)]
    pub public: bool,
    /// Size ceiling in MB
    #[arg(long, value_name = "MB")]
    pub size: Option<f64>,
    /// Accepted MIME subtypes, comma separated (mp4,webm)
    #[arg(long, value_delimiter = ',', value_name = "SUBTYPES")]
    pub accept: Vec<String>,
    /// Maximum number of committed files (defaults to the number of paths)
    #[arg(long)]
    pub max_num: Option<usize>,
    /// Maximum video duration in seconds (needs ffprobe)
    #[arg(long, value_name = "SECS")]
    pub limit_duration: Option<f64>,
    /// Signed URL lifetime in seconds
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<u64>,
    /// Output committed entries as JSON
    #[arg(long)]
    pub json: bool,
}

impl UploadArgs {
    /// Layer flags over a loaded configuration.
    pub fn apply_to(&self, config: &mut UploaderConfig) {
        if self.image {
            config.media_kind = MediaKind::Image;
        }
        if self.public {
            config.is_private = false;
        }
        if self.size.is_some() {
            config.size_mb = self.size;
        }
        if !self.accept.is_empty() {
            config.accept.clone_from(&self.accept);
        }
        config.max_num = self.max_num.unwrap_or_else(|| self.paths.len().max(1));
        if self.limit_duration.is_some() {
            config.limit_duration_secs = self.limit_duration;
        }
        if let Some(time_limit) = self.time_limit {
            config.time_limit_secs = time_limit;
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the config file with backend endpoints
    Init {
        /// Base URL of the upload backend API
        #[arg(long)]
        api_base_url: Option<String>,
        /// Form-upload host of the storage region
        #[arg(long)]
        upload_host: Option<String>,
        /// Domain serving public objects
        #[arg(long)]
        public_domain: Option<String>,
        /// Object key prefix
        #[arg(long)]
        key_prefix: Option<String>,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}
