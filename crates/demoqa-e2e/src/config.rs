//! Suite configuration.
//!
//! [`SuiteConfig`] is built once at startup (from the environment or from CLI
//! flags) and handed down explicitly; nothing else in the crate reads
//! environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::browser::BrowserConfig;
use crate::credentials::Credentials;
use crate::page_object::AssertionMode;

/// Default site under test
pub const DEFAULT_BASE_URL: &str = "https://demoqa.com";
/// Environment label used when `ENV` is not set
pub const UNKNOWN_ENVIRONMENT: &str = "Unknown";

/// Per-test log sink configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory holding `<suite>-<date>.log` files
    pub dir: PathBuf,
    /// Size at which the current file rolls over to a numbered sibling
    pub max_file_bytes: u64,
    /// Log files older than this many days are deleted
    pub retention_days: u32,
    /// Mirror lines to stdout
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            max_file_bytes: 10 * 1024 * 1024,
            retention_days: 7,
            console: true,
        }
    }
}

impl LogConfig {
    /// Set the log directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the rollover size
    #[must_use]
    pub const fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Set the retention window
    #[must_use]
    pub const fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Enable or disable console output
    #[must_use]
    pub const fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }
}

/// Report locations and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Where result and attachment files are written
    pub results_dir: PathBuf,
    /// Previously generated report (source of `history/`)
    pub report_dir: PathBuf,
    /// Categories definition copied into the results
    pub categories: PathBuf,
    /// Value written to `environment.properties`
    pub environment: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("allure-results"),
            report_dir: PathBuf::from("allure-report"),
            categories: PathBuf::from("report-utils").join("categories.json"),
            environment: UNKNOWN_ENVIRONMENT.to_string(),
        }
    }
}

impl ReportConfig {
    /// Set the results directory
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set the previous report directory
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Set the categories file
    #[must_use]
    pub fn with_categories(mut self, path: impl Into<PathBuf>) -> Self {
        self.categories = path.into();
        self
    }

    /// Set the environment label
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

/// Everything a run needs, resolved up front
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Site root, without trailing slash
    pub base_url: String,
    /// Browser launch options
    pub browser: BrowserConfig,
    /// Logging options
    pub log: LogConfig,
    /// Report options
    pub report: ReportConfig,
    /// How form validation reports several mismatches
    pub assertion_mode: AssertionMode,
    /// Stored credentials, when both keys were present
    pub credentials: Option<Credentials>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserConfig::default(),
            log: LogConfig::default(),
            report: ReportConfig::default(),
            assertion_mode: AssertionMode::default(),
            credentials: None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl SuiteConfig {
    /// Load `.env` (if present) and read the process environment
    #[must_use]
    pub fn from_env() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    ///
    /// Recognized keys: `DEMOQA_BASE_URL`, `HEADLESS`, `CHROMIUM_PATH`,
    /// `ACTION_TIMEOUT_MS`, `LOG_DIR`, `ENV`, `USERNAME`, `PASSWORD`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("DEMOQA_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(headless) = lookup("HEADLESS").as_deref().and_then(parse_flag) {
            config.browser = config.browser.with_headless(headless);
        }
        if let Some(path) = lookup("CHROMIUM_PATH").filter(|p| !p.is_empty()) {
            config.browser = config.browser.with_chromium_path(path);
        }
        if let Some(ms) = lookup("ACTION_TIMEOUT_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.browser = config.browser.with_action_timeout(Duration::from_millis(ms));
        }
        if let Some(dir) = lookup("LOG_DIR").filter(|d| !d.is_empty()) {
            config.log = config.log.with_dir(dir);
        }
        if let Some(env) = lookup("ENV").filter(|e| !e.trim().is_empty()) {
            config.report = config.report.with_environment(env);
        }
        config.credentials = Credentials::from_lookup(&lookup).ok();
        config
    }

    /// Set the site root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set logging options
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Set report options
    #[must_use]
    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    /// Set the assertion mode
    #[must_use]
    pub const fn with_assertion_mode(mut self, mode: AssertionMode) -> Self {
        self.assertion_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log.dir, PathBuf::from("logs"));
        assert_eq!(config.log.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.log.retention_days, 7);
        assert_eq!(config.report.environment, UNKNOWN_ENVIRONMENT);
        assert_eq!(config.assertion_mode, AssertionMode::FailFast);
        assert!(config.credentials.is_none());
        assert!(config.browser.headless);
    }

    #[test]
    fn test_environment_overrides() {
        let config = SuiteConfig::from_lookup(lookup_from(&[
            ("DEMOQA_BASE_URL", "http://localhost:3000/"),
            ("HEADLESS", "false"),
            ("CHROMIUM_PATH", "/opt/chromium"),
            ("ACTION_TIMEOUT_MS", "9000"),
            ("LOG_DIR", "/tmp/logs"),
            ("ENV", "staging"),
            ("USERNAME", "maya"),
            ("PASSWORD", "s3cret"),
        ]));
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.chromium_path.as_deref(), Some("/opt/chromium"));
        assert_eq!(config.browser.action_timeout, Duration::from_millis(9000));
        assert_eq!(config.log.dir, PathBuf::from("/tmp/logs"));
        assert_eq!(config.report.environment, "staging");
        assert_eq!(config.credentials.map(|c| c.username), Some("maya".to_string()));
    }

    #[test]
    fn test_unparseable_flag_ignored() {
        let config = SuiteConfig::from_lookup(lookup_from(&[("HEADLESS", "maybe")]));
        assert!(config.browser.headless);
    }

    #[test]
    fn test_partial_credentials_dropped() {
        let config = SuiteConfig::from_lookup(lookup_from(&[("USERNAME", "maya")]));
        assert!(config.credentials.is_none());
    }
}
