//! Local file selected for upload

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use tokio_util::io::ReaderStream;

use crate::{Error, Result};

/// Where the file bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Bytes),
}

/// A file picked by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, used in the object key.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, e.g. `video/mp4`.
    pub mime: String,
    pub source: FileSource,
}

impl UploadFile {
    /// Describe a file on disk. The MIME type is guessed from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(Error::InvalidInput(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} has no usable file name", path.display()))
            })?;

        Ok(Self {
            mime: guess_mime(&name),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Describe an in-memory buffer. Without an explicit MIME type one is
    /// guessed from the name.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>, mime: Option<&str>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let mime = mime
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| guess_mime(&name), ToString::to_string);
        Self {
            name,
            size: bytes.len() as u64,
            mime,
            source: FileSource::Memory(bytes),
        }
    }

    /// Size in MB (1024 * 1024 bytes).
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }

    /// The part of the MIME type after `/`, lowercased.
    pub fn mime_subtype(&self) -> String {
        self.mime
            .split_once('/')
            .map_or(self.mime.as_str(), |(_, subtype)| subtype)
            .trim()
            .to_ascii_lowercase()
    }

    /// Stream the file contents in chunks of at most `chunk_size` bytes.
    pub async fn byte_stream(&self, chunk_size: usize) -> Result<BoxStream<'static, io::Result<Bytes>>> {
        let chunk_size = chunk_size.max(1);
        match &self.source {
            FileSource::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                Ok(ReaderStream::with_capacity(file, chunk_size).boxed())
            }
            FileSource::Memory(bytes) => {
                let bytes = bytes.clone();
                let chunks = (0..bytes.len())
                    .step_by(chunk_size)
                    .map(move |start| {
                        let end = (start + chunk_size).min(bytes.len());
                        Ok(bytes.slice(start..end))
                    })
                    .collect::<Vec<_>>();
                Ok(stream::iter(chunks).boxed())
            }
        }
    }
}

fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
