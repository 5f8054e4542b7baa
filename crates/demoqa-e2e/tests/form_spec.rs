//! Student Registration Form scenarios against the simulated site.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use demoqa_e2e::mock::MockPage;
use demoqa_e2e::pages::registration::{self, locators};
use demoqa_e2e::prelude::*;
use demoqa_e2e::{file_contains, memory_logger, City, Gender, Hobby, LogConfig, Scenario, State};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn suite_config(logs: &TempDir) -> SuiteConfig {
    SuiteConfig::default().with_log(LogConfig::default().with_dir(logs.path()).with_console(false))
}

#[tokio::test]
async fn test_should_fill_the_form_with_valid_data() {
    let logs = TempDir::new().unwrap();
    let page = MockPage::demoqa();
    let handle = page.handle();

    let outcome = Scenario::RegistrationForm
        .run(Box::new(page), &suite_config(&logs))
        .await;

    assert!(outcome.passed(), "{:?}", outcome.error);
    assert!(handle.is_closed());
    assert_eq!(handle.screenshot_count(), 0);
    assert!(handle
        .text_of(&locators::table_value(registration::HOBBIES))
        .unwrap()
        .contains("Music, Reading"));
    assert!(handle
        .text_of(&locators::table_value(registration::GENDER))
        .unwrap()
        .contains("Female"));
    assert_eq!(
        handle
            .text_of(&locators::table_value(registration::STATE_AND_CITY))
            .as_deref(),
        Some("NCR Delhi")
    );

    let log = std::fs::read_dir(logs.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.file_name().unwrap().to_string_lossy().starts_with("Form Practice Page-"))
        .expect("suite log file");
    assert!(file_contains(
        &log,
        "[INFO] [Form Practice Page > should fill the form with valid data]: Before each hook: test started"
    ));
    assert!(file_contains(&log, "Test passed in "));
}

#[tokio::test]
async fn test_uploaded_picture_name_is_shown() {
    let path = Scenario::RegistrationForm.path();
    let page = MockPage::demoqa();
    let handle = page.handle();

    let outcome = TestFixture::new(path.clone(), Box::new(page))
        .with_logger(memory_logger(path).0)
        .run(|ctx| {
            Box::pin(async move {
                let record = RecordGenerator::with_rng(StdRng::seed_from_u64(11)).registration();
                let form = RegistrationPage::new(ctx.page(), ctx.logger());
                form.navigate().await?;
                form.fill_form(&record).await?;
                form.submit_form().await?;
                form.validate_form_submission(&record).await
            })
        })
        .await;

    assert!(outcome.passed(), "{:?}", outcome.error);
    assert_eq!(
        handle
            .text_of(&locators::table_value(registration::PICTURE))
            .as_deref(),
        Some("cat.jpeg")
    );
}

#[tokio::test]
async fn test_wrong_city_is_reported_with_both_values() {
    let path = Scenario::RegistrationForm.path();
    let (logger, out) = memory_logger(path.clone());

    let outcome = TestFixture::new(path, Box::new(MockPage::demoqa()))
        .with_logger(logger)
        .run(|ctx| {
            Box::pin(async move {
                let mut record = RecordGenerator::with_rng(StdRng::seed_from_u64(5)).registration();
                record.gender = Gender::Male;
                record.hobbies = vec![Hobby::Sports];
                record.state = State::Ncr;
                record.city = City::Delhi;

                let form = RegistrationPage::new(ctx.page(), ctx.logger());
                form.navigate().await?;
                form.fill_form(&record).await?;
                form.submit_form().await?;

                record.city = City::Noida;
                form.validate_form_submission(&record).await
            })
        })
        .await;

    assert!(!outcome.passed());
    let summary = outcome.failure_summary().unwrap();
    assert!(summary.contains("failed for 'State and City'"));
    assert!(summary.contains("Expected substring: \"NCR Noida\""));
    assert!(summary.contains("Received string: \"NCR Delhi\""));
    assert!(out.contents().contains(&format!("Test failed: {summary}")));
    assert!(outcome.screenshot().is_some());
}

#[tokio::test]
async fn test_missing_mobile_keeps_form_unsubmitted() {
    let path = Scenario::RegistrationForm.path();
    let outcome = TestFixture::new(path.clone(), Box::new(MockPage::demoqa()))
        .with_logger(memory_logger(path).0)
        .run(|ctx| {
            Box::pin(async move {
                let mut record = RecordGenerator::with_rng(StdRng::seed_from_u64(3)).registration();
                record.mobile = "123".into();
                let form = RegistrationPage::new(ctx.page(), ctx.logger());
                form.navigate().await?;
                form.fill_form(&record).await?;
                form.submit_form().await?;
                form.validate_form_submission(&record).await
            })
        })
        .await;

    assert!(!outcome.passed());
    assert!(outcome
        .failure_summary()
        .unwrap()
        .starts_with("Timed out"));
}
