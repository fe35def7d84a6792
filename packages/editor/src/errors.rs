//! Error types for the editor

use pagecraft_model::{NodeId, SettingsError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Failure reported by a content store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected the document: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("A save is already in progress")]
    SaveInProgress,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is {size} bytes, above the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Unsupported media type for {0}")]
    UnsupportedType(PathBuf),

    #[error("`{path}` of `{node}` is not a media setting")]
    NotAMediaControl { node: NodeId, path: String },
}
