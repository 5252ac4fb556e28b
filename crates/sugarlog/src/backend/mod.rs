//! Logger backends
//!
//! A [`Backend`] knows how to turn one of the two sink descriptions into a
//! [`Logger`]. [`LoggerConfig::build`](crate::LoggerConfig::build) picks the
//! sink; the backend owns everything after that, including the output format
//! and the rotation of the log file.

mod subscriber;

pub use subscriber::TracingBackend;

use std::path::PathBuf;

use crate::config::Level;
use crate::core::LogResult;
use crate::logger::Logger;

/// Console logger parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSink {
    /// Named streams to write to (`stdout`, `stderr`)
    pub destinations: Vec<String>,
    /// Minimum severity, `None` for the backend default
    pub level: Option<Level>,
    /// Filter directive overriding `level`
    pub filter: Option<String>,
    /// Human-readable instead of JSON output
    pub development: bool,
    /// UTC or local timestamps
    pub use_utc: bool,
}

/// Rotating file logger parameters
///
/// File output is always JSON lines, so there is no development flag, and an
/// unset `level` means info (the console falls back to debug in development).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    /// Active log file
    pub path: PathBuf,
    /// Rotation threshold in megabytes
    pub max_size_mb: u64,
    /// Rotated files to keep
    pub max_backups: usize,
    /// Days to keep rotated files, used when `max_backups` is zero
    pub max_age_days: u64,
    /// UTC or local timestamps in log lines
    pub use_utc: bool,
    /// Minimum severity, `None` for the backend default
    pub level: Option<Level>,
    /// Filter directive overriding `level`
    pub filter: Option<String>,
    /// Write from a background worker
    pub non_blocking: bool,
}

/// Sink chosen for a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Log to the console
    Console(ConsoleSink),
    /// Log to a rotating file
    File(FileSink),
}

/// Constructs loggers for the two kinds of sink
pub trait Backend {
    /// Build a console logger
    ///
    /// # Errors
    ///
    /// Returns error if the filter or a destination is invalid
    fn console(&self, sink: ConsoleSink) -> LogResult<Logger>;

    /// Build a rotating file logger
    ///
    /// # Errors
    ///
    /// Returns error if the filter is invalid or the file cannot be opened
    fn rotating_file(&self, sink: FileSink) -> LogResult<Logger>;

    /// Build a logger for either sink
    ///
    /// # Errors
    ///
    /// Propagates the error of the selected constructor
    fn build(&self, sink: Sink) -> LogResult<Logger> {
        match sink {
            Sink::Console(sink) => self.console(sink),
            Sink::File(sink) => self.rotating_file(sink),
        }
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    fn console(&self, sink: ConsoleSink) -> LogResult<Logger> {
        (**self).console(sink)
    }

    fn rotating_file(&self, sink: FileSink) -> LogResult<Logger> {
        (**self).rotating_file(sink)
    }
}
