//! Size-rotated log file sink with optional gzip compression and age-based
//! cleanup of backups.
//!
//! The active file keeps its configured name. When a write would push it
//! past the size limit it is renamed to `<stem>-<timestamp>.<ext>` (UTC,
//! millisecond precision) and a fresh file is opened. Backups older than
//! the max age are removed after each rotation.

use crate::sink::FailureLatch;
use chrono::{NaiveDateTime, TimeDelta, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use logport_config::FileOptions;
use logport_ports::LogSink;
use logport_shared::{ErrorCode, ErrorEnvelope};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const GZIP_SUFFIX: &str = ".gz";

/// Errors raised while opening or rotating a log file.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The log directory or file could not be created or opened.
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The active file could not be renamed to a backup.
    #[error("failed to rotate log file {path}: {source}")]
    Rotate {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A backup could not be compressed.
    #[error("failed to compress log backup {path}: {source}")]
    Compress {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    /// Stable error code.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } => ErrorCode::sink_open_failed(),
            Self::Rotate { .. } | Self::Compress { .. } => ErrorCode::sink_rotate_failed(),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Rotate { path, .. } | Self::Compress { path, .. } => {
                path
            },
        }
    }
}

impl From<SinkError> for ErrorEnvelope {
    fn from(error: SinkError) -> Self {
        let path = error.path().display().to_string();
        Self::expected(error.error_code(), error.to_string()).with_metadata("path", path)
    }
}

/// Rotation settings for [`RollingFileSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingConfig {
    /// Directory holding the active file and its backups.
    pub dir: PathBuf,
    /// Active file name.
    pub name: String,
    /// Rotate once the active file would exceed this many bytes; 0 disables.
    pub max_size_bytes: u64,
    /// Gzip backups after rotation.
    pub compress: bool,
    /// Remove backups older than this many days; 0 keeps everything.
    pub max_age_days: u32,
}

impl RollingConfig {
    /// Settings for the file sink described by `options`.
    #[must_use]
    pub fn from_file_options(options: &FileOptions) -> Self {
        Self {
            dir: PathBuf::from(&options.path),
            name: options.name.clone(),
            max_size_bytes: options.max_size_bytes(),
            compress: options.compress,
            max_age_days: options.max_age_days,
        }
    }

    /// Path of the active file.
    #[must_use]
    pub fn active_path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    fn stem_and_extension(&self) -> (&str, &str) {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, ext),
            _ => (self.name.as_str(), ""),
        }
    }

    fn backup_name(&self, timestamp: &str) -> String {
        match self.stem_and_extension() {
            (stem, "") => format!("{stem}-{timestamp}"),
            (stem, ext) => format!("{stem}-{timestamp}.{ext}"),
        }
    }

    /// Timestamp embedded in a backup file name, if `file_name` is one.
    fn backup_time(&self, file_name: &str) -> Option<NaiveDateTime> {
        let (stem, ext) = self.stem_and_extension();
        let name = file_name.strip_suffix(GZIP_SUFFIX).unwrap_or(file_name);
        let rest = name.strip_prefix(stem)?.strip_prefix('-')?;
        let timestamp = if ext.is_empty() {
            rest
        } else {
            rest.strip_suffix(ext)?.strip_suffix('.')?
        };
        NaiveDateTime::parse_from_str(timestamp, BACKUP_TIME_FORMAT).ok()
    }
}

#[derive(Debug)]
struct ActiveFile {
    file: File,
    size: u64,
}

/// Log sink appending to a size-rotated file.
///
/// Each line goes straight to the file under the sink mutex; nothing is
/// buffered in process. Backups are compressed after the mutex is released,
/// on the thread whose write triggered the rotation.
#[derive(Debug)]
pub struct RollingFileSink {
    config: RollingConfig,
    active: Mutex<Option<ActiveFile>>,
    failure: FailureLatch,
}

impl RollingFileSink {
    /// Create the directory if needed and open the active file for append.
    ///
    /// # Errors
    /// Returns [`SinkError::Open`] when the directory or file cannot be
    /// created or opened.
    pub fn open(config: RollingConfig) -> Result<Self, SinkError> {
        let active = open_active(&config)?;
        Ok(Self {
            config,
            active: Mutex::new(Some(active)),
            failure: FailureLatch::default(),
        })
    }

    /// Rotation settings.
    #[must_use]
    pub const fn config(&self) -> &RollingConfig {
        &self.config
    }

    /// Force a rotation now, regardless of size.
    ///
    /// # Errors
    /// Returns the first failure among rename, reopen and compression.
    pub fn rotate(&self) -> Result<(), SinkError> {
        let backup = {
            let mut guard = self.active.lock();
            self.rotate_locked(&mut guard)?
        };
        self.finish_backup(&backup)
    }

    /// Rename the active file to a fresh backup name and reopen it.
    fn rotate_locked(&self, slot: &mut Option<ActiveFile>) -> Result<PathBuf, SinkError> {
        drop(slot.take());

        let active_path = self.config.active_path();
        let timestamp = Utc::now().format(BACKUP_TIME_FORMAT).to_string();
        let backup_path = self.config.dir.join(self.config.backup_name(&timestamp));
        let renamed = fs::rename(&active_path, &backup_path).map_err(|source| SinkError::Rotate {
            path: active_path.clone(),
            source,
        });

        *slot = Some(open_active(&self.config)?);
        renamed.map(|()| backup_path)
    }

    /// Compress `backup` when configured and prune expired backups.
    ///
    /// Runs without the sink mutex held.
    fn finish_backup(&self, backup: &Path) -> Result<(), SinkError> {
        if self.config.compress {
            compress_backup(backup)?;
        }
        remove_expired_backups(&self.config);
        Ok(())
    }

    fn report(&self, error: &SinkError) {
        self.failure.report("file", &io::Error::other(error.to_string()));
    }
}

impl LogSink for RollingFileSink {
    fn write_line(&self, line: &str) {
        let mut guard = self.active.lock();
        let incoming = u64::try_from(line.len()).unwrap_or(u64::MAX);
        let needs_rotation = guard.as_ref().is_some_and(|active| {
            self.config.max_size_bytes > 0
                && active.size > 0
                && active.size + incoming > self.config.max_size_bytes
        });

        let mut backup = None;
        if guard.is_none() {
            match open_active(&self.config) {
                Ok(active) => *guard = Some(active),
                Err(error) => self.report(&error),
            }
        } else if needs_rotation {
            match self.rotate_locked(&mut guard) {
                Ok(path) => backup = Some(path),
                Err(error) => self.report(&error),
            }
        }

        if let Some(active) = guard.as_mut() {
            match active.file.write_all(line.as_bytes()) {
                Ok(()) => active.size += incoming,
                Err(error) => self.failure.report("file", &error),
            }
        }
        drop(guard);

        if let Some(backup) = backup {
            if let Err(error) = self.finish_backup(&backup) {
                self.report(&error);
            }
        }
    }

    fn flush(&self) {
        if let Some(active) = self.active.lock().as_mut() {
            if let Err(error) = active.file.flush() {
                self.failure.report("file", &error);
            }
        }
    }
}

fn open_active(config: &RollingConfig) -> Result<ActiveFile, SinkError> {
    let path = config.active_path();
    let open_error = |source| SinkError::Open {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(&config.dir).map_err(open_error)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(open_error)?;
    let size = file.metadata().map_err(open_error)?.len();
    Ok(ActiveFile { file, size })
}

fn compress_backup(path: &Path) -> Result<(), SinkError> {
    let mut target = path.as_os_str().to_owned();
    target.push(GZIP_SUFFIX);
    let target = PathBuf::from(target);
    let compress_error = |source| SinkError::Compress {
        path: path.to_path_buf(),
        source,
    };

    let mut input = File::open(path).map_err(compress_error)?;
    let output = File::create(&target).map_err(compress_error)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder).map_err(compress_error)?;
    encoder.finish().map_err(compress_error)?;
    fs::remove_file(path).map_err(compress_error)
}

fn remove_expired_backups(config: &RollingConfig) {
    if config.max_age_days == 0 {
        return;
    }
    let Ok(entries) = fs::read_dir(&config.dir) else {
        return;
    };
    let cutoff = Utc::now().naive_utc() - TimeDelta::days(i64::from(config.max_age_days));
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if config.backup_time(name).is_some_and(|time| time < cutoff) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::error::Error;
    use std::io::Read;

    fn config(dir: &Path, max_size_bytes: u64, compress: bool) -> RollingConfig {
        RollingConfig {
            dir: dir.to_path_buf(),
            name: "app.log".to_string(),
            max_size_bytes,
            compress,
            max_age_days: 0,
        }
    }

    fn backups(dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name != "app.log" {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    #[test]
    fn appends_to_existing_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("app.log"), "old\n")?;

        let sink = RollingFileSink::open(config(dir.path(), 0, false))?;
        sink.write_line("new\n");
        sink.flush();

        assert_eq!(fs::read_to_string(dir.path().join("app.log"))?, "old\nnew\n");
        Ok(())
    }

    #[test]
    fn lines_reach_disk_without_flush() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let sink = RollingFileSink::open(config(dir.path(), 0, false))?;

        sink.write_line("first\n");
        assert_eq!(fs::read_to_string(dir.path().join("app.log"))?, "first\n");

        sink.write_line("second\n");
        std::mem::forget(sink);
        assert_eq!(
            fs::read_to_string(dir.path().join("app.log"))?,
            "first\nsecond\n"
        );
        Ok(())
    }

    #[test]
    fn size_rotation_compresses_backup() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let sink = RollingFileSink::open(config(dir.path(), 10, true))?;

        sink.write_line("0123456\n");
        sink.write_line("abcdefg\n");

        assert_eq!(fs::read_to_string(dir.path().join("app.log"))?, "abcdefg\n");
        let names = backups(dir.path())?;
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".log.gz"), "{}", names[0]);

        let mut decoded = String::new();
        GzDecoder::new(File::open(dir.path().join(&names[0]))?).read_to_string(&mut decoded)?;
        assert_eq!(decoded, "0123456\n");
        Ok(())
    }

    #[test]
    fn creates_missing_directories() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");

        let sink = RollingFileSink::open(config(&nested, 0, false))?;
        sink.write_line("line\n");
        sink.flush();

        assert!(nested.join("app.log").is_file());
        Ok(())
    }

    #[test]
    fn rotates_when_size_limit_would_be_exceeded() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let sink = RollingFileSink::open(config(dir.path(), 10, false))?;

        sink.write_line("0123456\n");
        sink.write_line("abcdefg\n");
        sink.flush();

        assert_eq!(fs::read_to_string(dir.path().join("app.log"))?, "abcdefg\n");
        let names = backups(dir.path())?;
        assert_eq!(names.len(), 1);
        let backup = &names[0];
        assert!(backup.starts_with("app-") && backup.ends_with(".log"), "{backup}");
        assert_eq!(fs::read_to_string(dir.path().join(backup))?, "0123456\n");
        Ok(())
    }

    #[test]
    fn compressed_backups_are_gzip() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let sink = RollingFileSink::open(config(dir.path(), 0, true))?;
        sink.write_line("first\n");
        sink.rotate()?;

        let names = backups(dir.path())?;
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".log.gz"), "{}", names[0]);

        let mut decoded = String::new();
        GzDecoder::new(File::open(dir.path().join(&names[0]))?).read_to_string(&mut decoded)?;
        assert_eq!(decoded, "first\n");
        Ok(())
    }

    #[test]
    fn expired_backups_are_removed_on_rotation() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let stale = dir.path().join("app-2000-01-01T00-00-00.000.log.gz");
        let unrelated = dir.path().join("other-2000-01-01T00-00-00.000.log");
        fs::write(&stale, "old")?;
        fs::write(&unrelated, "keep")?;

        let mut settings = config(dir.path(), 0, false);
        settings.max_age_days = 1;
        let sink = RollingFileSink::open(settings)?;
        sink.write_line("x\n");
        sink.rotate()?;

        assert!(!stale.exists());
        assert!(unrelated.exists());
        assert_eq!(backups(dir.path())?.len(), 2);
        Ok(())
    }

    #[test]
    fn backup_time_parses_only_matching_names() {
        let settings = config(Path::new("/tmp"), 0, false);
        assert!(settings.backup_time("app-2024-02-03T04-05-06.789.log").is_some());
        assert!(settings.backup_time("app-2024-02-03T04-05-06.789.log.gz").is_some());
        assert!(settings.backup_time("app.log").is_none());
        assert!(settings.backup_time("app-notatime.log").is_none());
    }

    #[test]
    fn open_failure_maps_to_sink_error_code() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("file");
        fs::write(&blocker, "")?;

        let error = RollingFileSink::open(config(&blocker.join("sub"), 0, false))
            .err()
            .ok_or_else(|| io::Error::other("expected open failure"))?;
        let envelope = ErrorEnvelope::from(error);

        assert_eq!(envelope.code, ErrorCode::sink_open_failed());
        assert!(envelope.metadata.contains_key("path"));
        Ok(())
    }
}
