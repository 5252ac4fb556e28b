//! Core configuration types

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Default maximum size of the active log file, in megabytes
pub const DEFAULT_MAX_SIZE_MB: u64 = 128;
/// Default number of rotated files to keep
pub const DEFAULT_MAX_BACKUPS: usize = 3;
/// Default age in days after which rotated files are removed
pub const DEFAULT_MAX_AGE_DAYS: u64 = 28;

/// Logger configuration
///
/// Built from defaults plus an ordered list of [`LogOption`](super::LogOption)s,
/// or through the chained `with_*` setters. Once a logger has been produced with
/// [`build`](Self::build) further changes here do not reach it.
///
/// The config is meant to be owned by a single caller while it is being
/// assembled; mutation goes through `&mut self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Stamp events with UTC (`true`) or the local offset
    pub use_utc: bool,

    /// Rotating log file; `None` or an empty path selects the console
    pub log_file: Option<PathBuf>,

    /// Size in megabytes at which the log file is rotated
    pub max_size_mb: u64,

    /// Rotated files to retain (0 keeps all)
    pub max_backups: usize,

    /// Days to retain rotated files when `max_backups` is 0 (0 disables)
    pub max_age_days: u64,

    /// Human-readable console output instead of JSON
    pub development: bool,

    /// Minimum severity; `None` leaves the choice to the backend
    pub level: Option<Level>,

    /// Filter directive (e.g. `"info,hyper=warn"`), overrides `level`
    pub filter: Option<String>,

    /// Hand file writes to a background worker
    pub non_blocking: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            use_utc: true,
            log_file: None,
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            development: false,
            level: None,
            filter: None,
            non_blocking: true,
        }
    }
}

impl LoggerConfig {
    /// Log file path, if file output is selected
    ///
    /// An empty path counts as unset.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Set UTC or local timestamps
    pub fn with_utc(mut self, use_utc: bool) -> Self {
        self.use_utc = use_utc;
        self
    }

    /// Log to a rotating file instead of the console
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Set the rotation threshold in megabytes
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size_mb = megabytes;
        self
    }

    /// Set the number of rotated files to keep
    pub fn with_max_backups(mut self, backups: usize) -> Self {
        self.max_backups = backups;
        self
    }

    /// Set the retention window for rotated files
    pub fn with_max_age(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    /// Toggle development (human-readable) console output
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Set the minimum severity
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Set a filter directive
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Write the log file synchronously on the calling thread
    pub fn with_blocking_writes(mut self) -> Self {
        self.non_blocking = false;
        self
    }
}

/// Log level
///
/// An unset level (`None` in [`LoggerConfig::level`]) is resolved by the
/// backend. [`TracingBackend`](crate::TracingBackend) uses
/// [`Level::Info`], or [`Level::Debug`] for development consoles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl Level {
    /// Lowercase name, as used in filter directives
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}', expected trace, debug, info, warn or error")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => Self::TRACE,
            Level::Debug => Self::DEBUG,
            Level::Info => Self::INFO,
            Level::Warn => Self::WARN,
            Level::Error => Self::ERROR,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        Self::from_level(level.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert!(config.use_utc);
        assert_eq!(config.log_file, None);
        assert_eq!(config.max_size_mb, 128);
        assert_eq!(config.max_backups, 3);
        assert_eq!(config.max_age_days, 28);
        assert!(!config.development);
        assert_eq!(config.level, None);
        assert_eq!(config.filter, None);
        assert!(config.non_blocking);
    }

    #[test]
    fn test_empty_file_path_counts_as_unset() {
        let config = LoggerConfig::default().with_file("");
        assert_eq!(config.log_file, Some(PathBuf::new()));
        assert_eq!(config.file_path(), None);

        let config = config.with_file("logs/app.log");
        assert_eq!(config.file_path(), Some(Path::new("logs/app.log")));
    }

    #[test]
    fn test_chained_setters() {
        let config = LoggerConfig::default()
            .with_utc(false)
            .with_max_size(10)
            .with_max_size(20)
            .with_max_backups(7)
            .with_max_age(1)
            .with_development(true)
            .with_level(Level::Warn)
            .with_filter("warn,hyper=error")
            .with_blocking_writes();

        assert!(!config.use_utc);
        assert_eq!(config.max_size_mb, 20);
        assert_eq!(config.max_backups, 7);
        assert_eq!(config.max_age_days, 1);
        assert!(config.development);
        assert_eq!(config.level, Some(Level::Warn));
        assert_eq!(config.filter.as_deref(), Some("warn,hyper=error"));
        assert!(!config.non_blocking);
    }

    #[test]
    fn test_partial_json_overlays_defaults() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"log_file": "/tmp/app.log", "level": "debug"}"#).unwrap();
        assert_eq!(config.file_path(), Some(Path::new("/tmp/app.log")));
        assert_eq!(config.level, Some(Level::Debug));
        assert_eq!(config.max_size_mb, DEFAULT_MAX_SIZE_MB);
        assert!(config.use_utc);
    }

    #[rstest]
    #[case("trace", Level::Trace)]
    #[case("DEBUG", Level::Debug)]
    #[case(" info ", Level::Info)]
    #[case("warning", Level::Warn)]
    #[case("Error", Level::Error)]
    fn test_level_from_str(#[case] input: &str, #[case] expected: Level) {
        assert_eq!(input.parse::<Level>().unwrap(), expected);
    }

    #[test]
    fn test_level_from_str_rejects_unknown() {
        let err = "loud".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("'loud'"));
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(tracing::Level::from(Level::Warn), tracing::Level::WARN);
        assert_eq!(LevelFilter::from(Level::Trace), LevelFilter::TRACE);
        assert!(Level::Debug < Level::Error);
        assert_eq!(Level::Info.to_string(), "info");
    }
}
