//! Error types for the model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Invalid settings path: {0}")]
    InvalidPath(String),

    #[error("Cannot descend into non-object value at {0}")]
    NotAnObject(String),

    #[error("Invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },
}
