//! Default backend on top of `tracing-subscriber`

// Standard library
use std::io::{self, IsTerminal};

// External dependencies
use tracing::Dispatch;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::LevelFilter,
    fmt::{self, format::JsonFields, writer::BoxMakeWriter},
    layer::SubscriberExt,
};

// Internal crates
use super::{Backend, ConsoleSink, FileSink};
use crate::config::Level;
use crate::core::{ConstructionError, LogResult};
use crate::format::{Clock, JsonLines};
use crate::logger::Logger;
use crate::writer::{self, RotationPolicy};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Backend producing `tracing` subscribers
///
/// - console, production: one JSON object per line, see [`JsonLines`]
/// - console, development: human-readable lines, colored on a terminal
/// - file: JSON lines into a [`RollingFile`](crate::RollingFile)
///
/// Without a level the console logs at info (debug in development) and the
/// file at info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl Backend for TracingBackend {
    fn console(&self, sink: ConsoleSink) -> LogResult<Logger> {
        let fallback = if sink.development {
            Level::Debug
        } else {
            Level::Info
        };
        let filter = make_filter(sink.filter.as_deref(), sink.level.unwrap_or(fallback))?;
        let writer = writer::console_writer(sink.destinations.as_slice())?;
        let clock = Clock::new(sink.use_utc);

        let layer = if sink.development {
            let colors = sink.destinations.iter().all(|name| is_terminal(name));
            text_layer(writer, clock, colors)
        } else {
            json_layer(writer, clock)
        };

        Ok(Logger::from_dispatch(dispatch(layer, filter)))
    }

    fn rotating_file(&self, sink: FileSink) -> LogResult<Logger> {
        let filter = make_filter(sink.filter.as_deref(), sink.level.unwrap_or(Level::Info))?;
        let clock = Clock::new(sink.use_utc);
        let policy = RotationPolicy {
            path: sink.path,
            max_size_mb: sink.max_size_mb,
            max_backups: sink.max_backups,
            max_age_days: sink.max_age_days,
        };

        let (writer, guard) = writer::file_writer(policy, sink.non_blocking)?;
        let dispatch = dispatch(json_layer(writer, clock), filter);

        Ok(match guard {
            Some(guard) => Logger::with_worker(dispatch, guard),
            None => Logger::from_dispatch(dispatch),
        })
    }
}

/// Filter from an explicit directive, or from a single level
fn make_filter(directive: Option<&str>, level: Level) -> LogResult<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::builder()
            .parse(directive)
            .map_err(|e| ConstructionError::filter(directive, e)),
        None => Ok(EnvFilter::default().add_directive(LevelFilter::from(level).into())),
    }
}

fn dispatch(layer: BoxedLayer, filter: EnvFilter) -> Dispatch {
    Dispatch::new(Registry::default().with(layer).with(filter))
}

fn json_layer(writer: BoxMakeWriter, clock: Clock) -> BoxedLayer {
    fmt::layer()
        .fmt_fields(JsonFields::new())
        .event_format(JsonLines::new(clock))
        .with_writer(writer)
        .with_ansi(false)
        .boxed()
}

fn text_layer(writer: BoxMakeWriter, clock: Clock, colors: bool) -> BoxedLayer {
    fmt::layer()
        .with_timer(clock)
        .with_writer(writer)
        .with_ansi(colors)
        .with_target(true)
        .boxed()
}

fn is_terminal(destination: &str) -> bool {
    match destination {
        "stdout" => io::stdout().is_terminal(),
        "stderr" => io::stderr().is_terminal(),
        _ => false,
    }
}
