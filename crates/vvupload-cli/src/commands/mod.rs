pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod token;
pub mod upload;
pub mod url;
