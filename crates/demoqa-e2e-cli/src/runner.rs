//! Command handlers

use std::path::Path;

use demoqa_e2e::{
    prepare_results_dir, AssertionMode, CredentialStore, Credentials, PrepareSummary,
    ReportConfig, Reporter, SuiteConfig,
};

use crate::commands::{PrepareReportArgs, RunArgs};
use crate::error::{CliError, CliResult};

/// Resolve the suite configuration: environment first, then flags
#[must_use]
pub fn suite_config(base: SuiteConfig, args: &RunArgs) -> SuiteConfig {
    let mut config = base;
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.as_str());
    }
    if args.headed {
        config.browser = config.browser.with_headless(false);
    }
    if let Some(path) = &args.chromium_path {
        config.browser = config.browser.with_chromium_path(path.as_str());
    }
    if let Some(dir) = &args.results_dir {
        config.report = config.report.with_results_dir(dir);
    }
    if args.collect_all {
        config = config.with_assertion_mode(AssertionMode::Collect);
    }
    config
}

/// Report settings from prepare-report flags over the environment-derived `base`
#[must_use]
pub fn report_config(base: ReportConfig, args: &PrepareReportArgs) -> ReportConfig {
    let environment = args
        .environment
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map_or_else(|| base.environment.clone(), str::to_string);
    base.with_results_dir(&args.results_dir)
        .with_report_dir(&args.report_dir)
        .with_categories(&args.categories)
        .with_environment(environment)
}

/// Launch Chromium and run every selected scenario concurrently, one page each
#[cfg(feature = "browser")]
pub async fn run_suite(config: &SuiteConfig, args: &RunArgs) -> CliResult<Reporter> {
    use demoqa_e2e::{Browser, Page};
    use futures::future::join_all;

    let scenarios = args.scenarios();
    let browser = Browser::launch(config.browser.clone()).await?;

    let mut pages: Vec<Box<dyn Page>> = Vec::with_capacity(scenarios.len());
    for _ in &scenarios {
        pages.push(Box::new(browser.new_page().await?));
    }
    tracing::info!(count = scenarios.len(), base_url = %config.base_url, "running scenarios");

    let outcomes = join_all(
        scenarios
            .iter()
            .zip(pages)
            .map(|(scenario, page)| scenario.run(page, config)),
    )
    .await;

    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "browser did not shut down cleanly");
    }

    let mut reporter = Reporter::new();
    for outcome in outcomes {
        reporter.record(outcome);
    }
    Ok(reporter)
}

/// Without the `browser` feature there is nothing to drive
#[cfg(not(feature = "browser"))]
pub async fn run_suite(_config: &SuiteConfig, _args: &RunArgs) -> CliResult<Reporter> {
    Err(CliError::FeatureDisabled {
        command: "run",
        feature: "browser",
    })
}

/// Print one line per outcome and the summary; error when anything failed
pub fn finish_run(reporter: &Reporter, results_dir: &Path) -> CliResult<()> {
    reporter.write_allure(results_dir)?;
    for outcome in reporter.outcomes() {
        match outcome.failure_summary() {
            None => println!(
                "  ✓ {} ({}ms)",
                outcome.path.label(),
                outcome.duration.as_millis()
            ),
            Some(summary) => println!("  ✗ {}: {summary}", outcome.path.label()),
        }
    }
    println!("{}", reporter.summary());
    println!("Results written to {}", results_dir.display());

    if reporter.all_passed() {
        Ok(())
    } else {
        Err(CliError::TestsFailed {
            failed: reporter.failed_count(),
            total: reporter.total_count(),
        })
    }
}

/// Prepare the results directory and print what was done
pub fn prepare_report(base: ReportConfig, args: &PrepareReportArgs) -> CliResult<PrepareSummary> {
    let config = report_config(base, args);
    let summary = prepare_results_dir(&config)?;
    println!(
        "Environment file created: {}",
        summary.environment_file.display()
    );
    if summary.history_copied {
        println!("History folder copied to results");
    } else {
        println!("No history folder found in {}", config.report_dir.display());
    }
    if summary.categories_copied {
        println!("Categories file copied to results");
    } else {
        println!("No categories file at {}", config.categories.display());
    }
    Ok(summary)
}

/// Overwrite the credential file
pub fn save_credentials(username: &str, password: &str, file: &Path) -> CliResult<()> {
    if username.trim().is_empty() {
        return Err(CliError::config("username must not be empty"));
    }
    CredentialStore::new(file).save(&Credentials::new(username, password))?;
    println!("Credentials saved to {}", file.display());
    Ok(())
}

/// Load the credential file and report who it belongs to
pub fn check_credentials(file: &Path) -> CliResult<Credentials> {
    let credentials = CredentialStore::new(file).load()?;
    println!("Credentials found for {}", credentials.username);
    Ok(credentials)
}
