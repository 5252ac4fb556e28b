//! The structured logger handle

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::dispatcher::{self, DefaultGuard, Dispatch, SetGlobalDefaultError};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::Level;

/// Key-value context attached to a single event
///
/// Rendered as one nested JSON object under the `context` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Create empty fields
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    ///
    /// Values that fail to serialize are skipped.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(v) = serde_json::to_value(value) {
            self.0.insert(key.into(), v);
        }
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if fields are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A map of JSON values always serializes.
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// Callsites need a constant level, so each event is expanded once per level.
macro_rules! emit {
    ($level:expr, $($field:tt)+) => {
        match $level {
            Level::Trace => tracing::event!(tracing::Level::TRACE, $($field)+),
            Level::Debug => tracing::event!(tracing::Level::DEBUG, $($field)+),
            Level::Info => tracing::event!(tracing::Level::INFO, $($field)+),
            Level::Warn => tracing::event!(tracing::Level::WARN, $($field)+),
            Level::Error => tracing::event!(tracing::Level::ERROR, $($field)+),
        }
    };
}

/// Ready-to-use structured logger
///
/// Cheap to clone; clones share the same subscriber and background writer.
/// Buffered file output is flushed when the last clone is dropped, so keep a
/// handle alive for as long as the logger is in use, including after
/// [`try_init_global`](Self::try_init_global).
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    /// Flushes and stops the background file worker on drop
    worker: Option<Arc<WorkerGuard>>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("background_writer", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Wrap a dispatch built by a [`Backend`](crate::Backend)
    #[must_use]
    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch,
            worker: None,
        }
    }

    /// Wrap a dispatch whose writer runs on a background worker
    #[must_use]
    pub fn with_worker(dispatch: Dispatch, guard: WorkerGuard) -> Self {
        Self {
            dispatch,
            worker: Some(Arc::new(guard)),
        }
    }

    /// Logger that discards everything
    #[must_use]
    pub fn disabled() -> Self {
        Self::from_dispatch(Dispatch::none())
    }

    /// Underlying dispatch
    #[must_use]
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default
    ///
    /// `tracing` macros and spans inside `f` go to this logger.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the thread's default until the guard drops
    pub fn set_default(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }

    /// Install this logger as the process-wide default
    ///
    /// # Errors
    ///
    /// Returns error if a global default was already set
    pub fn try_init_global(&self) -> Result<(), SetGlobalDefaultError> {
        dispatcher::set_global_default(self.dispatch.clone())
    }

    /// Log a message at `level`
    pub fn log(&self, level: Level, msg: impl fmt::Display) {
        self.in_scope(|| emit!(level, message = %msg));
    }

    /// Log a message at `level` with key-value context
    pub fn log_with(&self, level: Level, msg: impl fmt::Display, fields: &Fields) {
        if fields.is_empty() {
            self.log(level, msg);
        } else {
            let context = fields.to_string();
            self.in_scope(|| emit!(level, context = context.as_str(), message = %msg));
        }
    }

    /// Log at trace level
    pub fn trace(&self, msg: impl fmt::Display) {
        self.log(Level::Trace, msg);
    }

    /// Log at debug level
    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(Level::Debug, msg);
    }

    /// Log at info level
    pub fn info(&self, msg: impl fmt::Display) {
        self.log(Level::Info, msg);
    }

    /// Log at warn level
    pub fn warn(&self, msg: impl fmt::Display) {
        self.log(Level::Warn, msg);
    }

    /// Log at error level
    pub fn error(&self, msg: impl fmt::Display) {
        self.log(Level::Error, msg);
    }

    /// Log at debug level with context
    pub fn debug_with(&self, msg: impl fmt::Display, fields: &Fields) {
        self.log_with(Level::Debug, msg, fields);
    }

    /// Log at info level with context
    pub fn info_with(&self, msg: impl fmt::Display, fields: &Fields) {
        self.log_with(Level::Info, msg, fields);
    }

    /// Log at warn level with context
    pub fn warn_with(&self, msg: impl fmt::Display, fields: &Fields) {
        self.log_with(Level::Warn, msg, fields);
    }

    /// Log at error level with context
    pub fn error_with(&self, msg: impl fmt::Display, fields: &Fields) {
        self.log_with(Level::Error, msg, fields);
    }

    /// Whether an event at `level` would be recorded
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.in_scope(|| match level {
            Level::Trace => tracing::enabled!(tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(tracing::Level::INFO),
            Level::Warn => tracing::enabled!(tracing::Level::WARN),
            Level::Error => tracing::enabled!(tracing::Level::ERROR),
        })
    }
}
