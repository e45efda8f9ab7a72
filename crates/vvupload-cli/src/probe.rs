//! Video duration probing through `ffprobe`.

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::process::Command;
use vvupload_core::models::{FileSource, UploadFile};
use vvupload_core::validate::DurationProbe;
use vvupload_core::{Error, Result};

const DEFAULT_FFPROBE: &str = "ffprobe";

/// Runs `ffprobe` on files read from disk.
#[derive(Debug, Clone)]
pub struct FfprobeDuration {
    program: String,
}

impl Default for FfprobeDuration {
    fn default() -> Self {
        Self {
            program: std::env::var("VVUPLOAD_FFPROBE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FFPROBE.to_string()),
        }
    }
}

impl FfprobeDuration {
    async fn probe(&self, file: &UploadFile) -> Result<f64> {
        let FileSource::Path(path) = &file.source else {
            return Err(Error::InvalidInput(format!(
                "cannot probe {} without a file on disk",
                file.name
            )));
        };

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InvalidInput(format!(
                "{} failed on {}: {}",
                self.program,
                file.name,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration(&stdout).ok_or_else(|| {
            Error::InvalidInput(format!("{} reported no duration for {}", self.program, file.name))
        })?;
        tracing::debug!("{} lasts {duration:.1}s", file.name);
        Ok(duration)
    }
}

impl DurationProbe for FfprobeDuration {
    fn duration_secs<'a>(&'a self, file: &'a UploadFile) -> BoxFuture<'a, Result<f64>> {
        self.probe(file).boxed()
    }
}

/// First finite, non-negative number printed by `ffprobe`.
pub fn parse_duration(output: &str) -> Option<f64> {
    output
        .lines()
        .filter_map(|line| line.trim().parse::<f64>().ok())
        .find(|value| value.is_finite() && *value >= 0.0)
}
