//! Text Box form scenarios against the simulated site.

#![allow(clippy::unwrap_used)]

use demoqa_e2e::mock::MockPage;
use demoqa_e2e::pages::text_box::locators;
use demoqa_e2e::prelude::*;
use demoqa_e2e::{memory_logger, LogConfig, Scenario};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::test]
async fn test_should_fill_the_form_with_valid_data() {
    let logs = tempfile::tempdir().unwrap();
    let config = SuiteConfig::default()
        .with_log(LogConfig::default().with_dir(logs.path()).with_console(false));
    let page = MockPage::demoqa();
    let handle = page.handle();

    let outcome = Scenario::TextBox.run(Box::new(page), &config).await;

    assert!(outcome.passed(), "{:?}", outcome.error);
    assert!(handle.is_closed());

    let current = handle.text_of(&locators::current_address_output()).unwrap();
    let permanent = handle.text_of(&locators::permanent_address_output()).unwrap();
    let current = current.strip_prefix("Current Address :").unwrap();
    let permanent = permanent.strip_prefix("Permananet Address :").unwrap();
    assert_eq!(current, permanent);
    assert!(!current.is_empty());
}

#[tokio::test]
async fn test_filling_twice_shows_only_second_record() {
    let path = Scenario::TextBox.path();
    let page = MockPage::demoqa();
    let handle = page.handle();

    let outcome = TestFixture::new(path.clone(), Box::new(page))
        .with_logger(memory_logger(path).0)
        .run(|ctx| {
            Box::pin(async move {
                let mut generator = RecordGenerator::with_rng(StdRng::seed_from_u64(21));
                let first = generator.text_box();
                let mut second = generator.text_box();
                second.full_name = format!("{} Junior", first.full_name);

                let form = TextBoxPage::new(ctx.page(), ctx.logger());
                form.navigate().await?;
                form.fill_form(&first).await?;
                form.fill_form(&second).await?;
                form.submit_form().await?;
                form.validate_form_submission(&second).await
            })
        })
        .await;

    assert!(outcome.passed(), "{:?}", outcome.error);
    let name = handle.text_of(&locators::name_output()).unwrap();
    assert!(name.ends_with(" Junior"));
}

#[tokio::test]
async fn test_invalid_email_hides_output() {
    let path = Scenario::TextBox.path();
    let page = MockPage::demoqa();
    let handle = page.handle();

    let outcome = TestFixture::new(path.clone(), Box::new(page))
        .with_logger(memory_logger(path).0)
        .run(|ctx| {
            Box::pin(async move {
                let mut record = RecordGenerator::with_rng(StdRng::seed_from_u64(8)).text_box();
                record.email = "not-an-email".into();
                let form = TextBoxPage::new(ctx.page(), ctx.logger());
                form.navigate().await?;
                form.fill_form(&record).await?;
                form.submit_form().await?;
                form.validate_form_submission(&record).await
            })
        })
        .await;

    assert!(!outcome.passed());
    assert!(handle.text_of(&locators::name_output()).is_none());
    assert!(outcome
        .failure_summary()
        .unwrap()
        .contains("Locator: locator('#output > div > #name')"));
}
