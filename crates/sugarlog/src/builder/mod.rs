//! Logger construction
//!
//! The only decision made here is which sink a configuration describes: a
//! non-empty log file selects the rotating file, anything else the console.
//! Construction itself is delegated to a [`Backend`].

use crate::backend::{Backend, ConsoleSink, FileSink, Sink, TracingBackend};
use crate::config::LoggerConfig;
use crate::core::LogResult;
use crate::logger::Logger;

/// Console the default configuration writes to
const CONSOLE_DESTINATION: &str = "stdout";

impl LoggerConfig {
    /// Sink this configuration selects
    #[must_use]
    pub fn sink(&self) -> Sink {
        match self.file_path() {
            Some(path) => Sink::File(FileSink {
                path: path.to_path_buf(),
                max_size_mb: self.max_size_mb,
                max_backups: self.max_backups,
                max_age_days: self.max_age_days,
                use_utc: self.use_utc,
                level: self.level,
                filter: self.filter.clone(),
                non_blocking: self.non_blocking,
            }),
            None => Sink::Console(ConsoleSink {
                destinations: vec![CONSOLE_DESTINATION.to_string()],
                level: self.level,
                filter: self.filter.clone(),
                development: self.development,
                use_utc: self.use_utc,
            }),
        }
    }

    /// Build a logger with [`TracingBackend`]
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - Log file or its directory cannot be created
    pub fn build(&self) -> LogResult<Logger> {
        self.build_with(&TracingBackend)
    }

    /// Build a logger with the given backend
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports, unchanged
    pub fn build_with<B: Backend + ?Sized>(&self, backend: &B) -> LogResult<Logger> {
        backend.build(self.sink())
    }
}
