use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("template source not found: {0}")]
    MissingSource(PathBuf),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("no config found at {0}; run `relay init` first")]
    ConfigMissing(PathBuf),

    #[error("role {0} does not receive tasks")]
    NoTaskQueue(String),

    #[error("malformed mailbox file {path}: {message}")]
    MalformedMailbox { path: PathBuf, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
