//! Configuration presets for common scenarios

use std::str::FromStr;

use super::{Level, LoggerConfig};

impl LoggerConfig {
    /// Create configuration from environment variables
    ///
    /// Recognised: `SUGARLOG_UTC`, `SUGARLOG_FILE`, `SUGARLOG_MAX_SIZE`,
    /// `SUGARLOG_MAX_BACKUPS`, `SUGARLOG_MAX_AGE`, `SUGARLOG_DEVELOPMENT`,
    /// `SUGARLOG_LEVEL`, and `SUGARLOG_LOG` or `RUST_LOG` for a filter
    /// directive. Values that do not parse leave the default in place.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("SUGARLOG_UTC").and_then(|v| parse_flag(&v)) {
            config.use_utc = v;
        }
        if let Some(path) = lookup("SUGARLOG_FILE") {
            config.log_file = Some(path.into());
        }
        if let Some(v) = parse(&lookup, "SUGARLOG_MAX_SIZE") {
            config.max_size_mb = v;
        }
        if let Some(v) = parse(&lookup, "SUGARLOG_MAX_BACKUPS") {
            config.max_backups = v;
        }
        if let Some(v) = parse(&lookup, "SUGARLOG_MAX_AGE") {
            config.max_age_days = v;
        }
        if let Some(v) = lookup("SUGARLOG_DEVELOPMENT").and_then(|v| parse_flag(&v)) {
            config.development = v;
        }
        if let Some(level) = parse::<Level>(&lookup, "SUGARLOG_LEVEL") {
            config.level = Some(level);
        }

        // Parse SUGARLOG_LOG or RUST_LOG
        config.filter = lookup("SUGARLOG_LOG").or_else(|| lookup("RUST_LOG"));

        config
    }

    /// Development configuration (human-readable, debug level, local time)
    #[must_use]
    pub fn development() -> Self {
        Self {
            development: true,
            level: Some(Level::Debug),
            use_utc: false,
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level, UTC)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: Some(Level::Info),
            ..Self::default()
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
