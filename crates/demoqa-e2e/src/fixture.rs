//! Per-test fixture with before/after hooks.
//!
//! [`TestFixture::run`] owns the page session for exactly one test body:
//!
//! 1. create the test logger and log the start of the test
//! 2. run the body, catching panics as failures
//! 3. on failure, log the condensed error and attach a full-page screenshot;
//!    on success, log the duration
//! 4. close the page
//!
//! Each log line, the screenshot and the close are isolated: an error or panic
//! in one is recorded in [`TestOutcome::finalize_errors`] and the remaining
//! steps still run.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use regex::Regex;

use crate::browser::Page;
use crate::config::LogConfig;
use crate::logger::{TestLogger, TestPath};
use crate::result::{FormError, FormResult};

/// Name of the screenshot attached to failed tests
pub const FAILURE_SCREENSHOT: &str = "Failure Screenshot";
/// Content type of screenshot attachments
pub const PNG_CONTENT_TYPE: &str = "image/png";
/// Raw failure text used when the error carries none
pub const MISSING_ERROR: &str = "Error not found";

const KEPT_PREFIXES: [&str; 5] = ["Error", "Timed out", "Locator:", "Expected", "Received"];

/// Condense a failure message to its diagnostic lines.
///
/// ANSI escapes are removed, each line is trimmed, and only lines starting
/// with `Error`, `Timed out`, `Locator:`, `Expected` or `Received` are kept,
/// joined by `" | "`.
#[must_use]
pub fn format_failure_message(raw: Option<&str>) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    let raw = raw.unwrap_or(MISSING_ERROR);
    let clean = match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(raw, "").into_owned(),
        None => raw.to_string(),
    };
    clean
        .split('\n')
        .map(str::trim)
        .filter(|line| KEPT_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Lifecycle phase of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    Initializing,
    Running,
    Passed,
    Failed,
    Finalizing,
    Closed,
}

/// Final status of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A binary artifact attached to a test result
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.body.len())
            .finish()
    }
}

/// What a test body can reach: its page, logger and attachment list
pub struct TestContext {
    path: TestPath,
    page: Box<dyn Page>,
    logger: TestLogger,
    attachments: Mutex<Vec<Attachment>>,
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("path", &self.path)
            .field("page", &self.page)
            .finish()
    }
}

impl TestContext {
    /// Identity of the running test
    #[must_use]
    pub const fn path(&self) -> &TestPath {
        &self.path
    }

    /// Page session owned by this test
    #[must_use]
    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    /// Logger bound to this test
    #[must_use]
    pub const fn logger(&self) -> &TestLogger {
        &self.logger
    }

    /// Attach an artifact to the test result
    pub fn attach(&self, name: impl Into<String>, content_type: impl Into<String>, body: Vec<u8>) {
        self.attachments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Attachment {
                name: name.into(),
                content_type: content_type.into(),
                body,
            });
    }

    fn take_attachments(&self) -> Vec<Attachment> {
        std::mem::take(&mut *self.attachments.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Result of one fixture run
#[derive(Debug)]
pub struct TestOutcome {
    pub path: TestPath,
    pub status: TestStatus,
    /// Full error text of a failed test
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub phases: Vec<TestPhase>,
    pub attachments: Vec<Attachment>,
    /// Errors raised by after-hook steps (screenshot, close)
    pub finalize_errors: Vec<String>,
}

impl TestOutcome {
    /// True if the body succeeded
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// Condensed failure text, as logged
    #[must_use]
    pub fn failure_summary(&self) -> Option<String> {
        (self.status == TestStatus::Failed).then(|| format_failure_message(self.error.as_deref()))
    }

    /// The failure screenshot, if one was captured
    #[must_use]
    pub fn screenshot(&self) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.name == FAILURE_SCREENSHOT)
    }

    /// Turn a failed outcome into an error
    ///
    /// # Errors
    ///
    /// [`FormError::TestFailed`] carrying the raw failure text.
    pub fn into_result(self) -> FormResult<()> {
        match self.status {
            TestStatus::Passed => Ok(()),
            TestStatus::Failed => Err(FormError::TestFailed {
                name: self.path.to_string(),
                message: self
                    .error
                    .unwrap_or_else(|| MISSING_ERROR.to_string()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// Emit a hook log line; a panicking sink is recorded instead of unwinding
fn log_step(step: &str, errors: &mut Vec<String>, emit: impl FnOnce()) {
    if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(emit)) {
        errors.push(format!("{step} log panicked: {}", panic_message(&*payload)));
    }
}

/// Fixture owning one page session for one test
pub struct TestFixture {
    path: TestPath,
    page: Box<dyn Page>,
    log: LogConfig,
    logger: Option<TestLogger>,
}

impl fmt::Debug for TestFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestFixture")
            .field("path", &self.path)
            .field("page", &self.page)
            .field("log", &self.log)
            .finish()
    }
}

impl TestFixture {
    /// Fixture for `path` taking ownership of `page`
    #[must_use]
    pub fn new(path: TestPath, page: Box<dyn Page>) -> Self {
        Self {
            path,
            page,
            log: LogConfig::default(),
            logger: None,
        }
    }

    /// Log sink settings for the logger created at run time
    #[must_use]
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Use a prepared logger instead of creating one
    #[must_use]
    pub fn with_logger(mut self, logger: TestLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run a test body through the full lifecycle
    pub async fn run<F>(self, body: F) -> TestOutcome
    where
        F: for<'c> FnOnce(&'c TestContext) -> BoxFuture<'c, FormResult<()>>,
    {
        let mut phases = vec![TestPhase::Initializing];
        let logger = self
            .logger
            .unwrap_or_else(|| TestLogger::new(self.path.clone(), &self.log));
        let ctx = TestContext {
            path: self.path,
            page: self.page,
            logger,
            attachments: Mutex::new(Vec::new()),
        };

        let mut finalize_errors = Vec::new();
        log_step("start", &mut finalize_errors, || {
            ctx.logger.info("Before each hook: test started");
        });
        phases.push(TestPhase::Running);
        let started_at = Utc::now();
        let started = Instant::now();
        let result = AssertUnwindSafe(body(&ctx)).catch_unwind().await;
        let duration = started.elapsed();

        let error = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("Error: test panicked: {}", panic_message(&*payload))),
        };
        let status = if error.is_some() {
            TestStatus::Failed
        } else {
            TestStatus::Passed
        };
        phases.push(match status {
            TestStatus::Passed => TestPhase::Passed,
            TestStatus::Failed => TestPhase::Failed,
        });

        phases.push(TestPhase::Finalizing);
        match &error {
            Some(raw) => {
                log_step("failure", &mut finalize_errors, || {
                    ctx.logger
                        .error(format!("Test failed: {}", format_failure_message(Some(raw))));
                });
                match AssertUnwindSafe(ctx.page().screenshot(true)).catch_unwind().await {
                    Ok(Ok(png)) => ctx.attach(FAILURE_SCREENSHOT, PNG_CONTENT_TYPE, png),
                    Ok(Err(e)) => finalize_errors.push(format!("screenshot: {e}")),
                    Err(payload) => finalize_errors
                        .push(format!("screenshot panicked: {}", panic_message(&*payload))),
                }
            }
            None => log_step("success", &mut finalize_errors, || {
                ctx.logger
                    .info(format!("Test passed in {}ms", duration.as_millis()));
            }),
        }

        match AssertUnwindSafe(ctx.page().close()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => finalize_errors.push(format!("close: {e}")),
            Err(payload) => {
                finalize_errors.push(format!("close panicked: {}", panic_message(&*payload)));
            }
        }
        phases.push(TestPhase::Closed);

        for e in &finalize_errors {
            let _ = std::panic::catch_unwind(AssertUnwindSafe(|| {
                ctx.logger.warn(format!("After each hook step failed: {e}"));
            }));
        }

        let attachments = ctx.take_attachments();
        TestOutcome {
            path: ctx.path,
            status,
            error,
            started_at,
            duration,
            phases,
            attachments,
            finalize_errors,
        }
    }
}
