//! Configuration types and options
//!
//! This module is organized into:
//! - `base`: [`LoggerConfig`] and [`Level`]
//! - `options`: reversible [`LogOption`]s and their constructors
//! - `presets`: environment loading and development/production setups

mod base;
mod options;
mod presets;

pub use base::{
    DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB, Level, LoggerConfig,
    ParseLevelError,
};
pub use options::{
    LogOption, Reverter, development, filter, level, log_file, log_utc, max_age, max_backups,
    max_size,
};
