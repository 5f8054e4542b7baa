//! Runs against the public DemoQA site with a real Chromium.
//!
//! Ignored by default: needs network access and a Chromium binary
//! (`CHROMIUM_PATH` if it is not on the path).
//!
//! ```text
//! cargo test -p demoqa-e2e --features browser --test live_demoqa -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use demoqa_e2e::{Browser, Reporter, Scenario, SuiteConfig};

async fn run_live(scenario: Scenario) {
    let config = SuiteConfig::from_env();
    let browser = Browser::launch(config.browser.clone()).await.unwrap();
    let page = browser.new_page().await.unwrap();

    let outcome = scenario.run(Box::new(page), &config).await;
    let mut reporter = Reporter::new();
    reporter.record(outcome);
    reporter.write_allure(&config.report.results_dir).unwrap();
    browser.close().await.unwrap();

    let outcome = &reporter.outcomes()[0];
    assert!(outcome.passed(), "{:?}", outcome.failure_summary());
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn test_live_registration_form() {
    run_live(Scenario::RegistrationForm).await;
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn test_live_text_box() {
    run_live(Scenario::TextBox).await;
}
