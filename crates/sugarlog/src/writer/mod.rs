//! Writer implementations

mod rolling;

pub use rolling::{RollingFile, RollingWriter, RotationPolicy};

// Standard library
use std::io;

// External dependencies
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

// Internal crates
use crate::core::{ConstructionError, LogResult};

/// Create a console writer writing to every named destination
///
/// Accepts `stdout` and `stderr`. Several destinations receive every line.
pub fn console_writer<S: AsRef<str>>(destinations: &[S]) -> LogResult<BoxMakeWriter> {
    let mut writers = destinations.iter().map(|name| match name.as_ref() {
        "stdout" => Ok(BoxMakeWriter::new(io::stdout)),
        "stderr" => Ok(BoxMakeWriter::new(io::stderr)),
        other => Err(ConstructionError::Destination {
            name: other.to_string(),
        }),
    });

    let first = writers.next().ok_or(ConstructionError::NoDestination)??;
    writers.try_fold(first, |tee, next| Ok(BoxMakeWriter::new(tee.and(next?))))
}

/// Create a rotating file writer
///
/// With `non_blocking` the file is moved to a background worker and the
/// returned guard must be kept alive for buffered lines to reach disk.
pub fn file_writer(
    policy: RotationPolicy,
    non_blocking: bool,
) -> LogResult<(BoxMakeWriter, Option<WorkerGuard>)> {
    let file = RollingFile::open(policy)?;

    if non_blocking {
        let (writer, guard) = tracing_appender::non_blocking(file);
        Ok((BoxMakeWriter::new(writer), Some(guard)))
    } else {
        Ok((BoxMakeWriter::new(file), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_destinations() {
        assert!(console_writer(&["stdout"]).is_ok());
        assert!(console_writer(&["stdout", "stderr"]).is_ok());
    }

    #[test]
    fn test_unknown_destination() {
        let err = console_writer(&["stdout", "/dev/null"]).unwrap_err();
        assert!(
            matches!(&err, ConstructionError::Destination { name } if name == "/dev/null"),
            "{err}"
        );
    }

    #[test]
    fn test_no_destination() {
        let err = console_writer::<&str>(&[]).unwrap_err();
        assert!(matches!(err, ConstructionError::NoDestination));
    }

    #[test]
    fn test_file_writer_unwritable_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let result = file_writer(
            RotationPolicy {
                path: blocker.join("app.log"),
                max_size_mb: 1,
                max_backups: 1,
                max_age_days: 1,
            },
            true,
        );
        assert!(matches!(result, Err(ConstructionError::CreateDir { .. })));
    }
}
