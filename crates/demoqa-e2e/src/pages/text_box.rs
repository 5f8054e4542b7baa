//! Text Box form (`/text-box`).

use async_trait::async_trait;

use crate::browser::Page;
use crate::config::DEFAULT_BASE_URL;
use crate::data::TextBoxRecord;
use crate::locator::{expect, Locator};
use crate::logger::TestLogger;
use crate::page_object::{AssertionMode, FormPage, PageObject, SubmissionCheck};
use crate::result::FormResult;

/// Path of the form under the site root
pub const PATH: &str = "/text-box";

/// Locators of the text box form
pub mod locators {
    use crate::locator::Locator;

    pub fn full_name() -> Locator {
        Locator::role("textbox", "Full Name")
    }

    pub fn email() -> Locator {
        Locator::role("textbox", "name@example.com")
    }

    pub fn current_address() -> Locator {
        Locator::role("textbox", "Current Address")
    }

    /// The input, not the output paragraph that shares its id
    pub fn permanent_address() -> Locator {
        Locator::new("textarea#permanentAddress")
    }

    pub fn submit() -> Locator {
        Locator::role("button", "Submit")
    }

    pub fn name_output() -> Locator {
        Locator::new("#output > div > #name")
    }

    pub fn email_output() -> Locator {
        Locator::new("#output > div > #email")
    }

    pub fn current_address_output() -> Locator {
        Locator::new("#output > div > #currentAddress")
    }

    pub fn permanent_address_output() -> Locator {
        Locator::new("#output > div > #permanentAddress")
    }
}

/// Page object for the text box form
#[derive(Debug)]
pub struct TextBoxPage<'a> {
    page: &'a dyn Page,
    logger: &'a TestLogger,
    base_url: String,
    mode: AssertionMode,
}

impl<'a> TextBoxPage<'a> {
    /// Bind to a page session and logger
    #[must_use]
    pub fn new(page: &'a dyn Page, logger: &'a TestLogger) -> Self {
        Self {
            page,
            logger,
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: AssertionMode::default(),
        }
    }

    /// Target another deployment of the site
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Choose how validation reports mismatches
    #[must_use]
    pub const fn with_assertion_mode(mut self, mode: AssertionMode) -> Self {
        self.mode = mode;
        self
    }
}

impl PageObject for TextBoxPage<'_> {
    fn url(&self) -> String {
        format!("{}{PATH}", self.base_url)
    }

    fn page_name(&self) -> &str {
        "Text Box"
    }

    fn readiness(&self) -> Locator {
        locators::full_name()
    }

    fn page(&self) -> &dyn Page {
        self.page
    }

    fn logger(&self) -> &TestLogger {
        self.logger
    }
}

#[async_trait]
impl FormPage for TextBoxPage<'_> {
    type Record = TextBoxRecord;

    async fn fill_form(&self, record: &TextBoxRecord) -> FormResult<()> {
        self.logger
            .info(format!("Filling text box form for {}", record.full_name));
        self.page.fill(&locators::full_name(), &record.full_name).await?;
        self.page.fill(&locators::email(), &record.email).await?;
        self.page
            .fill(&locators::current_address(), &record.current_address)
            .await?;
        self.page
            .fill(&locators::permanent_address(), &record.permanent_address)
            .await?;
        Ok(())
    }

    async fn submit_form(&self) -> FormResult<()> {
        self.logger.info("Submitting text box form");
        self.page.click(&locators::submit()).await
    }

    async fn validate_form_submission(&self, record: &TextBoxRecord) -> FormResult<()> {
        expect(self.page, &locators::name_output()).to_be_visible().await?;

        let mut check = SubmissionCheck::new(self.page, self.logger, self.mode);
        check
            .field("Name", &locators::name_output(), &record.full_name)
            .await?;
        check
            .field("Email", &locators::email_output(), &record.email)
            .await?;
        check
            .field(
                "Current Address",
                &locators::current_address_output(),
                &record.current_address,
            )
            .await?;
        check
            .field(
                "Permanent Address",
                &locators::permanent_address_output(),
                &record.permanent_address,
            )
            .await?;
        check.finish()?;

        self.logger.info("Text box submission validated");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logger::{memory_logger, TestPath};
    use crate::mock::MockPage;
    use crate::result::FormError;

    fn record(name: &str) -> TextBoxRecord {
        TextBoxRecord {
            full_name: name.to_string(),
            email: "maya.rossi7@example.com".to_string(),
            current_address: "12 Oak Street, Fairview, Ohio 44101, Canada".to_string(),
            permanent_address: "12 Oak Street, Fairview, Ohio 44101, Canada".to_string(),
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let page = MockPage::demoqa();
        let (logger, out) = memory_logger(TestPath::new("text_box.rs", "Text Box Page", "unit"));
        let form = TextBoxPage::new(&page, &logger);
        let record = record("Maya Rossi");

        form.navigate().await.unwrap();
        form.fill_form(&record).await.unwrap();
        form.submit_form().await.unwrap();
        form.validate_form_submission(&record).await.unwrap();

        assert!(out.contents().contains("Text box submission validated"));
        let handle = page.handle();
        let current = handle.text_of(&locators::current_address_output()).unwrap();
        let permanent = handle.text_of(&locators::permanent_address_output()).unwrap();
        assert!(current.ends_with(&record.current_address));
        assert!(permanent.ends_with(&record.current_address));
    }

    #[tokio::test]
    async fn test_collect_mode_reports_every_field() {
        let page = MockPage::demoqa();
        let (logger, _) = memory_logger(TestPath::new("text_box.rs", "Text Box Page", "unit"));
        let form = TextBoxPage::new(&page, &logger).with_assertion_mode(AssertionMode::Collect);
        let submitted = record("Maya Rossi");
        form.navigate().await.unwrap();
        form.fill_form(&submitted).await.unwrap();
        form.submit_form().await.unwrap();

        let expected = TextBoxRecord {
            full_name: "Someone Else".into(),
            email: "other@example.com".into(),
            ..submitted
        };
        match form.validate_form_submission(&expected).await.unwrap_err() {
            FormError::Assertions(all) => assert_eq!(all.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
