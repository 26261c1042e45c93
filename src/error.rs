use std::path::PathBuf;
use thiserror::Error;

pub type ImpexResult<T> = Result<T, ImpexError>;

#[derive(Error, Debug)]
pub enum ImpexError {
    #[error("Invalid path '{}': {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read workbook '{}': {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Malformed translation key '{raw}': nothing left after rectification")]
    MalformedKey { raw: String },

    #[error("Target directory already exists: {}", .0.display())]
    SetupConflict(PathBuf),

    #[error("Inconsistent language columns for key '{key}': expected {expected:?}, found {found:?}")]
    InconsistentColumns {
        key: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Conversion cancelled")]
    Cancelled,

    #[error("Conversion of '{}' timed out after {seconds}s", file.display())]
    Timeout { file: PathBuf, seconds: u64 },

    #[error("Conversion task for '{}' failed: {message}", file.display())]
    Task { file: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub(crate) const NOT_REGULAR_FILE: &str = "not a regular file";
pub(crate) const NOT_DIRECTORY: &str = "a directory path must be provided";
