//! Pre-upload file validation.
//!
//! Checks run in a fixed order and stop at the first rejection: size ceiling,
//! video MIME class, accepted subtypes, then (for duration-limited video) an
//! asynchronous duration probe. Nothing here touches the network.

use futures::future::BoxFuture;

use crate::config::UploaderConfig;
use crate::models::UploadFile;
use crate::{Error, Result, ValidationError};

/// Reads the playback duration of a media file, in seconds.
pub trait DurationProbe: Send + Sync {
    fn duration_secs<'a>(&'a self, file: &'a UploadFile) -> BoxFuture<'a, Result<f64>>;
}

/// Checks that need no I/O: size, MIME class, and subtype allowlist.
pub fn check_static(config: &UploaderConfig, file: &UploadFile) -> std::result::Result<(), ValidationError> {
    if let Some(limit_mb) = config.size_mb {
        let size_mb = file.size_mb();
        if size_mb >= limit_mb {
            return Err(ValidationError::SizeExceeded { size_mb, limit_mb });
        }
    }

    if config.is_video() && !file.mime.starts_with("video") {
        return Err(ValidationError::TypeMismatch {
            mime: file.mime.clone(),
        });
    }

    if !config.accept.is_empty() {
        let subtype = file.mime_subtype();
        if !config.accept.iter().any(|accepted| *accepted == subtype) {
            return Err(ValidationError::TypeMismatch {
                mime: file.mime.clone(),
            });
        }
    }

    Ok(())
}

/// Run every check, probing the duration when the config limits it.
pub async fn validate(
    config: &UploaderConfig,
    file: &UploadFile,
    probe: Option<&dyn DurationProbe>,
) -> Result<()> {
    check_static(config, file)?;

    let Some(limit_secs) = config.limit_duration_secs.filter(|_| config.is_video()) else {
        return Ok(());
    };
    let Some(probe) = probe else {
        return Err(Error::InvalidInput(
            "a duration limit is configured but no duration probe is available".to_string(),
        ));
    };

    let duration_secs = probe.duration_secs(file).await?;
    if duration_secs > limit_secs {
        return Err(ValidationError::DurationExceeded {
            duration_secs,
            limit_secs,
        }
        .into());
    }
    Ok(())
}
