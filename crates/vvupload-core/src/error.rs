//! Error types for vvupload-core

use thiserror::Error;

/// Result type alias using vvupload-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vvupload-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// File rejected before upload
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Request failed with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered with a non-success code
    #[error("Backend error {code}: {message}")]
    Api { code: i64, message: String },

    /// Backend answered successfully but the payload is unusable
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    /// Upload stream failed
    #[error("Upload failed: {0}")]
    Transport(String),

    /// Another upload owns the session slot
    #[error("An upload is already in progress")]
    SessionActive,

    /// The committed list is full
    #[error("File limit reached ({0} max)")]
    LimitReached(usize),

    /// Operation needs a live upload session
    #[error("No upload in progress")]
    NoActiveUpload,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a file is rejected before any network call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("File size {size_mb:.2} MB exceeds the {limit_mb} MB limit")]
    SizeExceeded { size_mb: f64, limit_mb: f64 },

    #[error("File type {mime} is not accepted")]
    TypeMismatch { mime: String },

    #[error("Video duration {duration_secs:.1}s exceeds the {limit_secs}s limit")]
    DurationExceeded { duration_secs: f64, limit_secs: f64 },
}

impl ValidationError {
    /// Short message shown to the user when the file is rejected.
    pub const fn notice(&self) -> &'static str {
        match self {
            Self::SizeExceeded { .. } => "File exceeds the size limit",
            Self::TypeMismatch { .. } => "Unsupported file type",
            Self::DurationExceeded { .. } => "Video exceeds the duration limit",
        }
    }
}
