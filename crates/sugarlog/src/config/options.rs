//! Reversible configuration options
//!
//! A [`LogOption`] carries one value for one [`LoggerConfig`] field. Applying
//! it overwrites the field and hands back another option holding the value
//! that was there before, so applying that one restores the earlier state.
//! Options are not validated; later options for the same field win.

use std::mem;
use std::path::PathBuf;

use super::{Level, LoggerConfig};

/// A single change to a [`LoggerConfig`] field
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LogOption {
    /// [`LoggerConfig::use_utc`]
    Utc(bool),
    /// [`LoggerConfig::log_file`]
    File(Option<PathBuf>),
    /// [`LoggerConfig::max_size_mb`]
    MaxSize(u64),
    /// [`LoggerConfig::max_backups`]
    MaxBackups(usize),
    /// [`LoggerConfig::max_age_days`]
    MaxAge(u64),
    /// [`LoggerConfig::development`]
    Development(bool),
    /// [`LoggerConfig::level`]
    Level(Option<Level>),
    /// [`LoggerConfig::filter`]
    Filter(Option<String>),
    /// [`LoggerConfig::non_blocking`]
    NonBlocking(bool),
}

impl LogOption {
    /// Write this value into `config` and return the option that undoes it
    pub fn apply(self, config: &mut LoggerConfig) -> LogOption {
        match self {
            Self::Utc(v) => Self::Utc(mem::replace(&mut config.use_utc, v)),
            Self::File(v) => Self::File(mem::replace(&mut config.log_file, v)),
            Self::MaxSize(v) => Self::MaxSize(mem::replace(&mut config.max_size_mb, v)),
            Self::MaxBackups(v) => Self::MaxBackups(mem::replace(&mut config.max_backups, v)),
            Self::MaxAge(v) => Self::MaxAge(mem::replace(&mut config.max_age_days, v)),
            Self::Development(v) => Self::Development(mem::replace(&mut config.development, v)),
            Self::Level(v) => Self::Level(mem::replace(&mut config.level, v)),
            Self::Filter(v) => Self::Filter(mem::replace(&mut config.filter, v)),
            Self::NonBlocking(v) => Self::NonBlocking(mem::replace(&mut config.non_blocking, v)),
        }
    }
}

/// Use UTC (`true`) or local timestamps
pub fn log_utc(use_utc: bool) -> LogOption {
    LogOption::Utc(use_utc)
}

/// Log to a rotating file instead of stdout
pub fn log_file(path: impl Into<PathBuf>) -> LogOption {
    LogOption::File(Some(path.into()))
}

/// Maximum size of the log file in megabytes before it is rotated
pub fn max_size(megabytes: u64) -> LogOption {
    LogOption::MaxSize(megabytes)
}

/// Number of rotated generations to keep
pub fn max_backups(backups: usize) -> LogOption {
    LogOption::MaxBackups(backups)
}

/// Maximum age in days of rotated files
pub fn max_age(days: u64) -> LogOption {
    LogOption::MaxAge(days)
}

/// Human-readable development output
pub fn development(development: bool) -> LogOption {
    LogOption::Development(development)
}

/// Minimum severity
pub fn level(level: Level) -> LogOption {
    LogOption::Level(Some(level))
}

/// Filter directive, overrides [`level`]
pub fn filter(directive: impl Into<String>) -> LogOption {
    LogOption::Filter(Some(directive.into()))
}

/// Undo history produced by [`LoggerConfig::apply_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "dropping a Reverter discards the undo history"]
pub struct Reverter {
    stack: Vec<LogOption>,
}

impl Reverter {
    /// Record the reverter of one applied option
    pub fn push(&mut self, option: LogOption) {
        self.stack.push(option);
    }

    /// Number of recorded reverters
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Apply the recorded reverters newest first
    pub fn undo(self, config: &mut LoggerConfig) {
        for option in self.stack.into_iter().rev() {
            option.apply(config);
        }
    }
}

impl LoggerConfig {
    /// Create a config from defaults and apply `options` in order
    pub fn new(options: impl IntoIterator<Item = LogOption>) -> Self {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    /// Apply one option, returning its reverter
    pub fn apply(&mut self, option: LogOption) -> LogOption {
        option.apply(self)
    }

    /// Apply options in order, returning the history needed to undo them
    pub fn apply_all(&mut self, options: impl IntoIterator<Item = LogOption>) -> Reverter {
        let mut reverter = Reverter::default();
        for option in options {
            reverter.push(option.apply(self));
        }
        reverter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(log_utc(false))]
    #[case(log_file("/tmp/app.log"))]
    #[case(max_size(10))]
    #[case(max_backups(0))]
    #[case(max_age(365))]
    #[case(development(true))]
    #[case(level(Level::Error))]
    #[case(filter("debug,hyper=warn"))]
    #[case(LogOption::NonBlocking(false))]
    fn test_reverter_restores_field(#[case] option: LogOption) {
        let original = LoggerConfig::default();
        let mut config = original.clone();

        let reverter = config.apply(option);
        assert_ne!(config, original);

        config.apply(reverter);
        assert_eq!(config, original);
    }

    #[test]
    fn test_reverter_carries_previous_value() {
        let mut config = LoggerConfig::default();
        assert_eq!(config.apply(max_size(64)), LogOption::MaxSize(128));
        assert_eq!(config.apply(log_file("a.log")), LogOption::File(None));
        assert_eq!(
            config.apply(LogOption::File(None)),
            LogOption::File(Some(PathBuf::from("a.log")))
        );
    }

    #[test]
    fn test_later_option_wins() {
        let config = LoggerConfig::new([max_size(10), max_size(20)]);
        assert_eq!(config.max_size_mb, 20);
    }

    #[test]
    fn test_new_without_options_is_default() {
        assert_eq!(LoggerConfig::new([]), LoggerConfig::default());
    }

    #[test]
    fn test_apply_all_then_undo() {
        let mut config = LoggerConfig::new([level(Level::Warn)]);
        let before = config.clone();

        let history = config.apply_all([
            max_size(1),
            max_size(2),
            log_file("/var/log/app.log"),
            log_utc(false),
            level(Level::Trace),
        ]);
        assert_eq!(history.len(), 5);
        assert_eq!(config.max_size_mb, 2);
        assert_eq!(config.level, Some(Level::Trace));

        history.undo(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_empty_history() {
        let mut config = LoggerConfig::default();
        let history = config.apply_all(Vec::new());
        assert!(history.is_empty());
        history.undo(&mut config);
        assert_eq!(config, LoggerConfig::default());
    }
}
