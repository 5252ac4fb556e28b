//! Size-rotated log file
//!
//! Rotation is done by `file-rotate`: once the active file has grown past the
//! size limit the next write first moves it to `<name>.<YYYYMMDDTHHMMSS>` and
//! starts a fresh file. Backups made within the same second get an extra
//! `.1`, `.2`, ... suffix, so no rotation overwrites an earlier one.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use parking_lot::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

use crate::core::{ConstructionError, LogResult};

const MEGABYTE: u64 = 1024 * 1024;
/// Limit used when the configured size is zero
const FALLBACK_MAX_SIZE_MB: u64 = 100;

type Rotating = FileRotate<AppendTimestamp>;

/// Rotation limits for a [`RollingFile`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Path of the active log file
    pub path: PathBuf,
    /// Rotate once the file has grown past this many megabytes (0 means 100)
    pub max_size_mb: u64,
    /// Rotated files to keep (0 keeps all)
    pub max_backups: usize,
    /// Remove rotated files older than this many days (0 disables)
    pub max_age_days: u64,
}

impl RotationPolicy {
    fn max_bytes(&self) -> usize {
        let megabytes = if self.max_size_mb == 0 {
            FALLBACK_MAX_SIZE_MB
        } else {
            self.max_size_mb
        };
        usize::try_from(megabytes.saturating_mul(MEGABYTE)).unwrap_or(usize::MAX)
    }

    /// Retention rule handed to `file-rotate`
    ///
    /// `file-rotate` enforces one limit, so a backup count wins over an age.
    fn file_limit(&self) -> FileLimit {
        if self.max_backups > 0 {
            return FileLimit::MaxFiles(self.max_backups);
        }
        i64::try_from(self.max_age_days)
            .ok()
            .filter(|days| *days > 0)
            .and_then(TimeDelta::try_days)
            .map_or(FileLimit::Unlimited, FileLimit::Age)
    }
}

/// Log file that rotates itself by size
///
/// Usable directly as an [`io::Write`] (for a background worker) or as a
/// [`MakeWriter`], in which case every event locks the file for its write.
pub struct RollingFile {
    path: PathBuf,
    inner: Mutex<Rotating>,
}

impl fmt::Debug for RollingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RollingFile {
    /// Open (or create) the active log file
    ///
    /// The parent directory is created when missing and the file is opened
    /// once up front, so an unusable path fails here instead of on the first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The path has no file name
    /// - The directory cannot be created
    /// - The file cannot be opened for appending
    pub fn open(policy: RotationPolicy) -> LogResult<Self> {
        let RotationPolicy { path, .. } = &policy;
        if path.file_name().is_none() {
            return Err(ConstructionError::InvalidPath { path: path.clone() });
        }

        // `file-rotate` needs a parent it can scan for backups
        let path = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => path.clone(),
            _ => Path::new(".").join(path),
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConstructionError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ConstructionError::OpenFile {
                path: policy.path.clone(),
                source,
            })?;

        let inner = FileRotate::new(
            &path,
            AppendTimestamp::default(policy.file_limit()),
            ContentLimit::BytesSurpassed(policy.max_bytes()),
            Compression::None,
            #[cfg(unix)]
            None,
        );

        Ok(Self {
            path: policy.path,
            inner: Mutex::new(inner),
        })
    }

    /// Path of the active log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.get_mut().flush()
    }
}

/// Locked handle to a [`RollingFile`], one per event
pub struct RollingWriter<'a> {
    inner: MutexGuard<'a, Rotating>,
}

impl fmt::Debug for RollingWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingWriter").finish_non_exhaustive()
    }
}

impl Write for RollingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter {
            inner: self.inner.lock(),
        }
    }
}
