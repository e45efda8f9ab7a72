//! vvupload-core - Core library for vvupload
//!
//! This crate contains the upload session state machine, the backend and
//! storage clients, and the committed file list used by every vvupload
//! front end.

pub mod backend;
pub mod config;
pub mod error;
pub mod list;
pub mod models;
pub mod notify;
pub mod request;
pub mod session;
pub mod transfer;
pub mod uploader;
pub mod util;
pub mod validate;

pub use error::{Error, Result, ValidationError};
pub use models::{FileEntry, UploadFile, UploadProgress};
pub use uploader::{SessionEvent, SessionSnapshot, Uploader};
