//! # sugarlog - option-driven structured loggers
//!
//! Collect a few options, get back a logger: JSON lines on stdout by default,
//! a size-rotated log file when a path is given.
//!
//! ## Quick Start
//!
//! ```rust
//! use sugarlog::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     let logger = LoggerConfig::new([log_utc(true), level(Level::Info)]).build()?;
//!
//!     logger.info_with("Server starting", &Fields::new().with("port", 8080));
//!     Ok(())
//! }
//! ```
//!
//! ## File output
//!
//! ```rust,no_run
//! use sugarlog::prelude::*;
//!
//! # fn main() -> LogResult<()> {
//! let logger = LoggerConfig::new([
//!     log_file("/var/log/app/app.log"),
//!     max_size(64),
//!     max_backups(5),
//!     max_age(14),
//! ])
//! .build()?;
//!
//! logger.warn("disk almost full");
//! # Ok(())
//! # }
//! ```
//!
//! Options return the option that undoes them, see [`LogOption::apply`] and
//! [`LoggerConfig::apply_all`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod backend;
mod builder;
mod config;
mod core;
mod format;
mod logger;
mod writer;

// Public API
pub use backend::{Backend, ConsoleSink, FileSink, Sink, TracingBackend};
pub use config::{
    DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB, Level, LogOption,
    LoggerConfig, ParseLevelError, Reverter, development, filter, level, log_file, log_utc,
    max_age, max_backups, max_size,
};
pub use crate::core::{ConstructionError, LogResult};
pub use format::{Clock, JsonLines};
pub use logger::{Fields, Logger};
pub use writer::{RollingFile, RollingWriter, RotationPolicy};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Fields, Level, LogOption, LogResult, Logger, LoggerConfig, development, filter, level,
        log_file, log_utc, max_age, max_backups, max_size,
    };
}

// Re-export tracing macros for use inside `Logger::in_scope`
pub use tracing::{debug, error, info, trace, warn};

/// Build a logger from defaults and `options`
///
/// # Errors
///
/// Returns [`ConstructionError`] if the backend cannot create the logger
pub fn new_logger(options: impl IntoIterator<Item = LogOption>) -> LogResult<Logger> {
    LoggerConfig::new(options).build()
}

/// Build a logger from `SUGARLOG_*` environment variables
///
/// # Errors
///
/// Returns [`ConstructionError`] if the backend cannot create the logger
pub fn from_env() -> LogResult<Logger> {
    LoggerConfig::from_env().build()
}
