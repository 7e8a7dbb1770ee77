// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} hand landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("landmark {index} is not finite")]
    NonFinite { index: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum MailboxError {
    #[error("frame publisher was dropped")]
    Closed,
}
