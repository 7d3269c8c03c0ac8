//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for spider
//!
//! Each variant carries enough context to be shown on the status line or
//! written to the log. Config parse problems never surface here; the
//! interpreter skips what it cannot read.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Unified error type for all spider operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file in the extension directory could not be opened as a module.
    #[error("Cannot load extension {path:?}: {reason}")]
    ExtensionLoad { path: PathBuf, reason: String },

    /// A module was opened but does not export a required entry point.
    #[error("Extension {path:?} does not export `{symbol}`")]
    MissingEntryPoint { path: PathBuf, symbol: &'static str },

    /// A module's create entry point returned no instance.
    #[error("Extension {path:?} failed to create a screen")]
    ExtensionCreate { path: PathBuf },

    /// File operation specific errors
    #[error("{operation} failed on {path:?}: {source}")]
    FileOperation {
        operation: &'static str, // "create", "delete", "rename", etc.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File operation refused before touching the filesystem.
    #[error("{operation} refused for {path:?}: {reason}")]
    OperationRefused {
        operation: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// Directory navigation errors
    #[error("Cannot read directory {path:?}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A child process could not be started or waited on.
    #[error("Failed to run {program}: {source}")]
    Process {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a file operation failure error
    pub fn file_operation<P: Into<PathBuf>>(operation: &'static str, path: P, source: io::Error) -> Self {
        Self::FileOperation {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn refused<P: Into<PathBuf>, S: Into<String>>(operation: &'static str, path: P, reason: S) -> Self {
        Self::OperationRefused {
            operation,
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn process<S: Into<String>>(program: S, source: io::Error) -> Self {
        Self::Process {
            program: program.into(),
            source,
        }
    }

    pub fn extension_load<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::ExtensionLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Message suitable for the one-line status bar.
    pub fn status_message(&self) -> String {
        match self {
            Self::FileOperation {
                operation, source, ..
            } => format!("Operation failed: {operation}: {source}"),
            Self::OperationRefused {
                operation, reason, ..
            } => format!("Operation failed: {operation}: {reason}"),
            other => other.to_string(),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_operation_and_cause() {
        let err = AppError::file_operation(
            "rename",
            "/tmp/a",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.status_message(), "Operation failed: rename: permission denied");
    }

    #[test]
    fn test_refused_message() {
        let err = AppError::refused("create", "/tmp/a", "already exists");
        assert_eq!(err.status_message(), "Operation failed: create: already exists");
    }
}
