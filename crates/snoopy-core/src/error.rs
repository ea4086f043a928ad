//! Error types for walking, parsing and output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building, transforming or writing a tree.
#[derive(Debug, Error)]
pub enum SnoopError {
    /// Root path is missing or not a directory.
    #[error("Path must be an existing directory: {path}")]
    InvalidPath { path: PathBuf },

    /// Listing or stating the entries of one directory failed.
    #[error("Failed to enumerate {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A human-readable expression could not be parsed.
    #[error("Cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Writing output failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SnoopError {
    /// Create an enumeration error with path context.
    pub fn enumeration(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Enumeration {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidPath { path } | Self::Enumeration { path, .. } | Self::Io { path, .. } => {
                Some(path)
            }
            Self::Parse { .. } | Self::InvalidConfig { .. } => None,
        }
    }
}

/// Kind of a captured enumeration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// Permission was denied.
    PermissionDenied,
    /// Entry vanished between listing and stating.
    NotFound,
    /// Any other failure while listing or stating.
    ReadError,
}

impl FaultKind {
    /// Classify an I/O error.
    pub fn from_io(error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::ReadError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_kind_from_io() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(FaultKind::from_io(&err), FaultKind::PermissionDenied);

        let err = std::io::Error::other("boom");
        assert_eq!(FaultKind::from_io(&err), FaultKind::ReadError);
    }

    #[test]
    fn test_error_path() {
        let err = SnoopError::enumeration(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.path(), Some(Path::new("/test/path")));
        assert!(err.to_string().contains("/test/path"));

        let err = SnoopError::parse("<< 3", "unknown operator");
        assert!(err.path().is_none());
        assert!(err.to_string().contains("unknown operator"));
    }
}
