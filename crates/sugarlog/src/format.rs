//! Format utilities (time, JSON lines)

use std::fmt;

use serde_json::{Map, Number, Value};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{JsonFields, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormattedFields};
use tracing_subscriber::registry::{LookupSpan, SpanRef};

/// Event field carrying [`Fields`](crate::Fields) as JSON text
pub(crate) const CONTEXT_FIELD: &str = "context";

/// Wall clock pinned to UTC or to a fixed offset
///
/// The local offset is resolved once, when the clock is created. Platforms
/// that cannot report it safely (Unix once threads are running) get UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    offset: UtcOffset,
}

impl Clock {
    /// UTC clock
    #[must_use]
    pub const fn utc() -> Self {
        Self::with_offset(UtcOffset::UTC)
    }

    /// Clock at the current local offset
    #[must_use]
    pub fn local() -> Self {
        Self::with_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// Clock at a fixed offset
    #[must_use]
    pub const fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// UTC when `use_utc`, local otherwise
    #[must_use]
    pub fn new(use_utc: bool) -> Self {
        if use_utc { Self::utc() } else { Self::local() }
    }

    /// Offset applied to timestamps
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Current time at this clock's offset
    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }

    /// Current time as an RFC 3339 stamp
    fn stamp(&self) -> Result<String, fmt::Error> {
        self.now().format(&Rfc3339).map_err(|_| fmt::Error)
    }
}

impl FormatTime for Clock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        w.write_str(&self.stamp()?)
    }
}

/// One JSON object per event
///
/// Event fields are flattened into the line next to `timestamp`, `level` and
/// `target`. The `context` field is decoded back into a nested object, and
/// the current span, if any, is rendered under `span` with its fields.
#[derive(Debug, Clone, Copy)]
pub struct JsonLines {
    clock: Clock,
}

impl JsonLines {
    /// Formatter stamping events with `clock`
    #[must_use]
    pub const fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

impl<S> FormatEvent<S, JsonFields> for JsonLines
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, JsonFields>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut line = Map::new();
        line.insert("timestamp".to_string(), Value::String(self.clock.stamp()?));
        line.insert("level".to_string(), Value::String(meta.level().to_string()));
        event.record(&mut JsonVisitor(&mut line));
        line.insert("target".to_string(), Value::String(meta.target().to_string()));
        if let Some(span) = ctx.lookup_current() {
            line.insert("span".to_string(), span_object(&span));
        }

        let json = serde_json::to_string(&line).map_err(|_| fmt::Error)?;
        writeln!(writer, "{json}")
    }
}

fn span_object<S>(span: &SpanRef<'_, S>) -> Value
where
    S: for<'a> LookupSpan<'a>,
{
    let mut object = span
        .extensions()
        .get::<FormattedFields<JsonFields>>()
        .and_then(|formatted| serde_json::from_str::<Map<String, Value>>(&formatted.fields).ok())
        .unwrap_or_default();
    object.insert("name".to_string(), Value::String(span.name().to_string()));
    Value::Object(object)
}

/// Records event fields as JSON values
struct JsonVisitor<'a>(&'a mut Map<String, Value>);

impl JsonVisitor<'_> {
    fn put(&mut self, field: &Field, value: Value) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor<'_> {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Number::from_f64(value).map_or(Value::Null, Value::Number));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let value = if field.name() == CONTEXT_FIELD {
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
        } else {
            Value::String(value.to_string())
        };
        self.put(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::String(format!("{value:?}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::{Registry, fmt as tfmt};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn lines(&self) -> Vec<Value> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    fn capture(clock: Clock, f: impl FnOnce()) -> Vec<Value> {
        let buffer = Buffer::default();
        let sink = buffer.clone();
        let layer = tfmt::layer()
            .fmt_fields(JsonFields::new())
            .event_format(JsonLines::new(clock))
            .with_writer(move || sink.clone());
        tracing::subscriber::with_default(Registry::default().with(layer), f);
        buffer.lines()
    }

    #[test]
    fn test_utc_clock() {
        let clock = Clock::new(true);
        assert_eq!(clock, Clock::utc());
        assert!(clock.now().offset().is_utc());
    }

    #[test]
    fn test_formatted_utc_stamp_ends_with_z() {
        let mut out = String::new();
        Clock::utc().format_time(&mut Writer::new(&mut out)).unwrap();
        assert!(out.ends_with('Z'), "unexpected stamp: {out}");
        assert!(OffsetDateTime::parse(&out, &Rfc3339).is_ok());
    }

    #[test]
    fn test_fixed_offset_stamp() {
        let offset = UtcOffset::from_hms(5, 30, 0).unwrap();
        let clock = Clock::with_offset(offset);

        let mut out = String::new();
        clock.format_time(&mut Writer::new(&mut out)).unwrap();
        assert!(out.ends_with("+05:30"), "unexpected stamp: {out}");
        assert_eq!(OffsetDateTime::parse(&out, &Rfc3339).unwrap().offset(), offset);
    }

    #[test]
    fn test_json_line_fields() {
        let lines = capture(Clock::utc(), || {
            tracing::warn!(attempt = 3, ratio = 0.5, ok = false, "retrying");
        });

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["message"], "retrying");
        assert_eq!(line["level"], "WARN");
        assert_eq!(line["attempt"], 3);
        assert_eq!(line["ratio"], 0.5);
        assert_eq!(line["ok"], false);
        assert_eq!(line["target"], module_path!());
        assert!(line.get("span").is_none());
    }

    #[test]
    fn test_context_is_nested_object() {
        let lines = capture(Clock::utc(), || {
            tracing::info!(context = r#"{"user":"ada","id":7}"#, "login");
            tracing::info!(context = "not json", "plain");
        });

        assert_eq!(lines[0]["context"]["user"], "ada");
        assert_eq!(lines[0]["context"]["id"], 7);
        assert_eq!(lines[1]["context"], "not json");
    }

    #[test]
    fn test_span_fields() {
        let lines = capture(Clock::utc(), || {
            let span = tracing::info_span!("request", id = 7);
            let _entered = span.enter();
            tracing::info!("inside");
        });

        assert_eq!(lines[0]["span"]["name"], "request");
        assert_eq!(lines[0]["span"]["id"], 7);
    }

    #[test]
    fn test_json_line_local_offset() {
        let offset = UtcOffset::from_hms(-3, 0, 0).unwrap();
        let lines = capture(Clock::with_offset(offset), || tracing::info!("tick"));

        let stamp = lines[0]["timestamp"].as_str().unwrap();
        assert!(stamp.ends_with("-03:00"), "unexpected stamp: {stamp}");
    }
}
