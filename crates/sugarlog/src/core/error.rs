//! Error handling for sugarlog
//!
//! Every failure while turning a [`LoggerConfig`](crate::LoggerConfig) into a
//! [`Logger`](crate::Logger) is a [`ConstructionError`]. Errors are handed back
//! to the caller unchanged: nothing here retries or falls back to another sink.

use std::io;
use std::path::{Path, PathBuf};

/// Type alias for Result with [`ConstructionError`] for logger construction
pub type LogResult<T> = Result<T, ConstructionError>;

/// The backend could not produce a logger
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConstructionError {
    /// Filter directive cannot be parsed
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// Directive as supplied
        filter: String,
        /// Parser message
        reason: String,
    },

    /// Log file path has no file name component
    #[error("invalid log file path (no file name): '{}'", .path.display())]
    InvalidPath {
        /// Offending path
        path: PathBuf,
    },

    /// Directory for the log file could not be created
    #[error("cannot create log directory '{}': {source}", .path.display())]
    CreateDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Log file could not be opened for appending
    #[error("cannot open log file '{}': {source}", .path.display())]
    OpenFile {
        /// File that was being opened
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Console destination is neither `stdout` nor `stderr`
    #[error("unknown console destination '{name}'")]
    Destination {
        /// Destination as supplied
        name: String,
    },

    /// Console sink was asked to write nowhere
    #[error("console sink needs at least one destination")]
    NoDestination,
}

impl ConstructionError {
    /// Create a filter parsing error
    pub fn filter(filter: impl Into<String>, reason: impl ToString) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }

    /// Path the failure refers to, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidPath { path }
            | Self::CreateDir { path, .. }
            | Self::OpenFile { path, .. } => Some(path),
            Self::Filter { .. } | Self::Destination { .. } | Self::NoDestination => None,
        }
    }

    /// Whether the failure came from the filesystem
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::CreateDir { .. } | Self::OpenFile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_message() {
        let error = ConstructionError::filter("app=loud", "invalid level");
        assert_eq!(error.to_string(), "invalid filter 'app=loud': invalid level");
        assert!(error.path().is_none());
        assert!(!error.is_io());
    }

    #[test]
    fn test_open_file_error_keeps_source() {
        let error = ConstructionError::OpenFile {
            path: PathBuf::from("/var/log/app.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.is_io());
        assert_eq!(error.path(), Some(Path::new("/var/log/app.log")));
        assert!(error.to_string().contains("/var/log/app.log"));

        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "denied");
    }
}
