//! Per-test structured logging.
//!
//! Every [`TestLogger`] owns its own `tracing` dispatcher so lines carry the
//! test's identity without any global state:
//!
//! ```text
//! 2026-10-17 14:03:11 [INFO] [Text Box Page > should fill the form with valid data]: Test passed in 812ms
//! ```
//!
//! Lines go to the console and to `<dir>/<suite>-<YYYY-MM-DD>.log`. The file
//! rolls over daily and at `max_file_bytes` (later parts get a `.N` suffix),
//! and files of the same suite older than `retention_days` are deleted when a
//! new day's file is opened. One file writer per suite is shared by every
//! logger in the process.

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{Local, NaiveDate};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::{FmtContext, MakeWriter, TestWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::config::LogConfig;

/// Identity of a test: source file, suite (describe block) and title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestPath {
    pub file: String,
    pub suite: String,
    pub title: String,
}

impl TestPath {
    /// Create a test path
    #[must_use]
    pub fn new(file: impl Into<String>, suite: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            suite: suite.into(),
            title: title.into(),
        }
    }

    /// `suite > title`, as printed in log lines
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} > {}", self.suite, self.title)
    }
}

impl fmt::Display for TestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} > {}", self.file, self.suite, self.title)
    }
}

struct TestLineFormat {
    label: String,
}

impl<S, N> FormatEvent<S, N> for TestLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} [{}] [{}]: ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            event.metadata().level(),
            self.label
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Logger bound to one test
pub struct TestLogger {
    path: TestPath,
    dispatch: tracing::Dispatch,
    file: Option<SharedFile>,
}

impl fmt::Debug for TestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestLogger")
            .field("path", &self.path)
            .field("file", &self.log_file())
            .finish()
    }
}

impl TestLogger {
    /// Logger writing to the console and the suite's rolling file.
    ///
    /// Falls back to console-only output (with a warning on the process
    /// subscriber) when the file cannot be opened.
    #[must_use]
    pub fn new(path: TestPath, config: &LogConfig) -> Self {
        let file = match SharedFile::for_suite(config, &path.suite) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(
                    dir = %config.dir.display(),
                    suite = %path.suite,
                    error = %e,
                    "cannot open log file, logging to console only"
                );
                None
            }
        };

        let writer = match (config.console, file.clone()) {
            (true, Some(file)) => BoxMakeWriter::new(TestWriter::new().and(file)),
            (false, Some(file)) => BoxMakeWriter::new(file),
            (true, None) => BoxMakeWriter::new(TestWriter::new()),
            (false, None) => BoxMakeWriter::new(io::sink),
        };
        Self::build(path, writer, file)
    }

    /// Logger writing to an arbitrary sink
    #[must_use]
    pub fn with_writer<W>(path: TestPath, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::build(path, BoxMakeWriter::new(writer), None)
    }

    fn build(path: TestPath, writer: BoxMakeWriter, file: Option<SharedFile>) -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .event_format(TestLineFormat { label: path.label() })
            .with_writer(writer)
            .finish();
        Self {
            path,
            dispatch: tracing::Dispatch::new(subscriber),
            file,
        }
    }

    /// Identity this logger was created for
    #[must_use]
    pub const fn path(&self) -> &TestPath {
        &self.path
    }

    /// File currently receiving lines, if any
    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        self.file.as_ref().map(SharedFile::current_path)
    }

    /// Log at debug level
    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(Level::DEBUG, message.as_ref());
    }

    /// Log at info level
    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(Level::INFO, message.as_ref());
    }

    /// Log at warn level
    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(Level::WARN, message.as_ref());
    }

    /// Log at error level
    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(Level::ERROR, message.as_ref());
    }

    fn emit(&self, level: Level, message: &str) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            if level == Level::ERROR {
                tracing::error!("{message}");
            } else if level == Level::WARN {
                tracing::warn!("{message}");
            } else if level == Level::INFO {
                tracing::info!("{message}");
            } else {
                tracing::debug!("{message}");
            }
        });
    }
}

/// Replace characters that are unsafe in file names
#[must_use]
pub fn sanitize_suite(suite: &str) -> String {
    let cleaned: String = suite
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "suite".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug)]
struct CurrentFile {
    date: NaiveDate,
    index: u32,
    file: File,
    size: u64,
}

/// Append-only log file rotated by date and size
#[derive(Debug)]
pub struct RollingFile {
    dir: PathBuf,
    suite: String,
    max_bytes: u64,
    retention_days: u32,
    current: Option<CurrentFile>,
}

impl RollingFile {
    /// Open (creating the directory if needed) the file for `today`
    pub fn open(config: &LogConfig, suite: &str, today: NaiveDate) -> io::Result<Self> {
        fs::create_dir_all(&config.dir)?;
        let mut rolling = Self {
            dir: config.dir.clone(),
            suite: sanitize_suite(suite),
            max_bytes: config.max_file_bytes.max(1),
            retention_days: config.retention_days,
            current: None,
        };
        rolling.switch_to(today)?;
        Ok(rolling)
    }

    /// File name for a date and rollover index
    #[must_use]
    pub fn file_name(suite: &str, date: NaiveDate, index: u32) -> String {
        let base = format!("{suite}-{}.log", date.format("%Y-%m-%d"));
        if index == 0 {
            base
        } else {
            format!("{base}.{index}")
        }
    }

    fn path_for(&self, date: NaiveDate, index: u32) -> PathBuf {
        self.dir.join(Self::file_name(&self.suite, date, index))
    }

    /// Path of the file currently written to
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        let (date, index) = self
            .current
            .as_ref()
            .map_or((Local::now().date_naive(), 0), |c| (c.date, c.index));
        self.path_for(date, index)
    }

    fn open_part(&self, date: NaiveDate, index: u32) -> io::Result<CurrentFile> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(date, index))?;
        let size = file.metadata()?.len();
        Ok(CurrentFile {
            date,
            index,
            file,
            size,
        })
    }

    fn switch_to(&mut self, date: NaiveDate) -> io::Result<()> {
        let mut index = 0;
        while self.path_for(date, index + 1).exists() {
            index += 1;
        }
        self.current = Some(self.open_part(date, index)?);
        if let Err(e) = self.prune(date) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "log retention pass failed");
        }
        Ok(())
    }

    /// Append one formatted line as of `today`
    pub fn write_at(&mut self, today: NaiveDate, buf: &[u8]) -> io::Result<()> {
        if self.current.as_ref().map_or(true, |c| c.date != today) {
            self.switch_to(today)?;
        }

        let len = buf.len() as u64;
        let roll = self
            .current
            .as_ref()
            .map_or(false, |c| c.size > 0 && c.size + len > self.max_bytes);
        if roll {
            let next = self.current.as_ref().map_or(1, |c| c.index + 1);
            self.current = Some(self.open_part(today, next)?);
        }

        let current = self
            .current
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file not open"))?;
        current.file.write_all(buf)?;
        current.size += len;
        Ok(())
    }

    /// Delete this suite's files whose date is more than `retention_days` before `today`
    pub fn prune(&self, today: NaiveDate) -> io::Result<usize> {
        let prefix = format!("{}-", self.suite);
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(rest) = name.strip_prefix(&prefix) else { continue };
            let (Some(date), Some(tail)) = (rest.get(..10), rest.get(10..)) else {
                continue;
            };
            if !tail.starts_with(".log") {
                continue;
            }
            let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                continue;
            };
            if (today - date).num_days() > i64::from(self.retention_days) {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

type Registry = Mutex<HashMap<PathBuf, Arc<Mutex<RollingFile>>>>;

fn registry() -> &'static Registry {
    static SINKS: OnceLock<Registry> = OnceLock::new();
    SINKS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Process-wide handle to a suite's [`RollingFile`]
#[derive(Debug, Clone)]
pub struct SharedFile {
    inner: Arc<Mutex<RollingFile>>,
}

impl SharedFile {
    /// Writer for `suite` under `config.dir`, opened on first use.
    ///
    /// Later calls for the same directory and suite return the same writer
    /// (the first call's size and retention settings stay in effect).
    pub fn for_suite(config: &LogConfig, suite: &str) -> io::Result<Self> {
        let key = config.dir.join(sanitize_suite(suite));
        let mut sinks = registry().lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = sinks.get(&key) {
            return Ok(Self {
                inner: Arc::clone(existing),
            });
        }
        let rolling = Arc::new(Mutex::new(RollingFile::open(
            config,
            suite,
            Local::now().date_naive(),
        )?));
        sinks.insert(key, Arc::clone(&rolling));
        Ok(Self { inner: rolling })
    }

    /// Path of the file currently written to
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current_path()
    }
}

impl io::Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_at(Local::now().date_naive(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Test helper: collects log output in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    /// Everything written so far
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
    }
}

impl io::Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Convenience for asserting on a logger's output in tests
#[must_use]
pub fn memory_logger(path: TestPath) -> (TestLogger, MemoryWriter) {
    let writer = MemoryWriter::default();
    (TestLogger::with_writer(path, writer.clone()), writer)
}

/// True when `path` exists and contains `needle`
#[must_use]
pub fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path).is_ok_and(|s| s.contains(needle))
}
