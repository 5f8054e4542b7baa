//! Result collection and Allure output.
//!
//! The [`Reporter`] gathers [`TestOutcome`]s and writes them as
//! Allure-compatible `<uuid>-result.json` files with their attachments.
//! [`prepare_results_dir`] is the pre-processing step run before the report
//! tool: it stamps the environment, carries over trend history and installs
//! the failure categories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::ReportConfig;
use crate::fixture::TestOutcome;
use crate::result::FormResult;

/// Name of the environment file inside the results directory
pub const ENVIRONMENT_FILE: &str = "environment.properties";
/// Trend history directory name
pub const HISTORY_DIR: &str = "history";
/// Categories file name
pub const CATEGORIES_FILE: &str = "categories.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllureAttachment {
    name: String,
    source: String,
    #[serde(rename = "type")]
    content_type: String,
}

#[derive(Debug, Serialize)]
struct AllureLabel {
    name: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct AllureStatusDetails {
    message: String,
    trace: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllureResult {
    uuid: String,
    history_id: String,
    full_name: String,
    name: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_details: Option<AllureStatusDetails>,
    stage: &'static str,
    start: i64,
    stop: i64,
    labels: Vec<AllureLabel>,
    attachments: Vec<AllureAttachment>,
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "application/json" => "json",
        "text/html" => "html",
        _ => "txt",
    }
}

/// Collected outcomes of a run
#[derive(Debug, Default)]
pub struct Reporter {
    suite_name: String,
    outcomes: Vec<TestOutcome>,
}

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub fn new() -> Self {
        Self {
            suite_name: "DemoQA".to_string(),
            outcomes: Vec::new(),
        }
    }

    /// Set suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Record an outcome
    pub fn record(&mut self, outcome: TestOutcome) {
        self.outcomes.push(outcome);
    }

    /// Recorded outcomes
    #[must_use]
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Get number of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Get number of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    /// Get total test count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Get pass rate (0.0 to 1.0)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.outcomes.len() as f64
    }

    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get total duration
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.outcomes.iter().map(|o| o.duration).sum()
    }

    /// Get failing tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        )
    }

    /// Write every outcome into `results_dir`; returns the result files written
    ///
    /// # Errors
    ///
    /// Returns error if a file cannot be written
    pub fn write_allure(&self, results_dir: &Path) -> FormResult<Vec<PathBuf>> {
        fs::create_dir_all(results_dir)?;
        let mut written = Vec::with_capacity(self.outcomes.len());

        for outcome in &self.outcomes {
            let mut attachments = Vec::with_capacity(outcome.attachments.len());
            for attachment in &outcome.attachments {
                let source = format!(
                    "{}-attachment.{}",
                    Uuid::new_v4(),
                    extension_for(&attachment.content_type)
                );
                fs::write(results_dir.join(&source), &attachment.body)?;
                attachments.push(AllureAttachment {
                    name: attachment.name.clone(),
                    source,
                    content_type: attachment.content_type.clone(),
                });
            }

            let full_name = outcome.path.to_string();
            let start = outcome.started_at.timestamp_millis();
            let stop = start + i64::try_from(outcome.duration.as_millis()).unwrap_or(i64::MAX - start);
            let status_details = outcome.error.as_ref().map(|raw| AllureStatusDetails {
                message: outcome.failure_summary().unwrap_or_default(),
                trace: raw.clone(),
            });
            let result = AllureResult {
                uuid: Uuid::new_v4().to_string(),
                history_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, full_name.as_bytes()).to_string(),
                full_name,
                name: outcome.path.title.clone(),
                status: outcome.status.to_string(),
                status_details,
                stage: "finished",
                start,
                stop,
                labels: vec![
                    AllureLabel {
                        name: "parentSuite",
                        value: self.suite_name.clone(),
                    },
                    AllureLabel {
                        name: "suite",
                        value: outcome.path.suite.clone(),
                    },
                    AllureLabel {
                        name: "testClass",
                        value: outcome.path.file.clone(),
                    },
                    AllureLabel {
                        name: "framework",
                        value: env!("CARGO_PKG_NAME").to_string(),
                    },
                ],
                attachments,
            };

            let path = results_dir.join(format!("{}-result.json", result.uuid));
            fs::write(&path, serde_json::to_vec_pretty(&result)?)?;
            written.push(path);
        }

        tracing::info!(
            dir = %results_dir.display(),
            results = written.len(),
            failed = self.failed_count(),
            "allure results written"
        );
        Ok(written)
    }
}

/// What [`prepare_results_dir`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareSummary {
    pub environment_file: PathBuf,
    pub history_copied: bool,
    pub categories_copied: bool,
}

/// Prepare the results directory for report generation.
///
/// Writes `environment.properties`, replaces `history/` with the previous
/// report's copy when one exists, and copies the categories file when it
/// exists. Missing sources are not errors.
pub fn prepare_results_dir(config: &ReportConfig) -> FormResult<PrepareSummary> {
    let results = &config.results_dir;
    fs::create_dir_all(results)?;

    let environment_file = results.join(ENVIRONMENT_FILE);
    fs::write(&environment_file, format!("environment={}", config.environment))?;

    let history_src = config.report_dir.join(HISTORY_DIR);
    let history_copied = if history_src.is_dir() {
        let history_dest = results.join(HISTORY_DIR);
        if history_dest.exists() {
            fs::remove_dir_all(&history_dest)?;
        }
        copy_dir(&history_src, &history_dest)?;
        tracing::info!(from = %history_src.display(), "history folder copied to results");
        true
    } else {
        tracing::info!(report = %config.report_dir.display(), "no history folder found");
        false
    };

    let categories_copied = if config.categories.is_file() {
        fs::copy(&config.categories, results.join(CATEGORIES_FILE))?;
        tracing::info!(from = %config.categories.display(), "categories copied to results");
        true
    } else {
        tracing::info!(path = %config.categories.display(), "no categories file found");
        false
    };

    tracing::info!(path = %environment_file.display(), "environment file created");
    Ok(PrepareSummary {
        environment_file,
        history_copied,
        categories_copied,
    })
}

fn copy_dir(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
