use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for image-pin-sync operations
///
/// Every variant is fatal: the run aborts at the first error and nothing
/// further is published.
#[derive(Error, Debug)]
pub enum ImageSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingToken(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Manifest is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No image found in the manifest for service '{0}'")]
    MissingImage(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation}: GitHub API returned {status}: {reason}")]
    Api {
        operation: String,
        status: u16,
        reason: String,
    },

    #[error("Command `{command}` failed with exit code {code}: {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Cannot patch {}: {source}", path.display())]
    Patch {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in image-pin-sync
pub type Result<T> = std::result::Result<T, ImageSyncError>;

impl ImageSyncError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ImageSyncError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ImageSyncError::Manifest(msg.into())
    }

    /// Create an API error for a non-success HTTP status
    pub fn api(operation: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        ImageSyncError::Api {
            operation: operation.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a subprocess failure error
    pub fn command(command: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        ImageSyncError::Command {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }
}
