//! Student Registration Form (`/automation-practice-form`).

use async_trait::async_trait;

use crate::browser::Page;
use crate::config::DEFAULT_BASE_URL;
use crate::data::RegistrationRecord;
use crate::locator::expect;
use crate::logger::TestLogger;
use crate::page_object::{activate_all, AssertionMode, FormPage, PageObject, SubmissionCheck};
use crate::result::FormResult;

/// Path of the form under the site root
pub const PATH: &str = "/automation-practice-form";

/// Confirmation table row labels
pub const STUDENT_NAME: &str = "Student Name";
pub const STUDENT_EMAIL: &str = "Student Email";
pub const GENDER: &str = "Gender";
pub const MOBILE: &str = "Mobile";
pub const DATE_OF_BIRTH: &str = "Date of Birth";
pub const SUBJECTS: &str = "Subjects";
pub const HOBBIES: &str = "Hobbies";
pub const PICTURE: &str = "Picture";
pub const ADDRESS: &str = "Address";
pub const STATE_AND_CITY: &str = "State and City";

/// Locators of the registration form
pub mod locators {
    use crate::data::{City, Gender, Hobby, State, Subject};
    use crate::locator::Locator;

    pub fn heading() -> Locator {
        Locator::role("heading", "Student Registration Form")
    }

    pub fn first_name() -> Locator {
        Locator::role("textbox", "First Name")
    }

    pub fn last_name() -> Locator {
        Locator::role("textbox", "Last Name")
    }

    pub fn email() -> Locator {
        Locator::role("textbox", "name@example.com")
    }

    pub fn gender(gender: Gender) -> Locator {
        Locator::exact_text(gender.label())
    }

    pub fn mobile() -> Locator {
        Locator::role("textbox", "Mobile Number")
    }

    pub fn date_of_birth() -> Locator {
        Locator::new("#dateOfBirthInput")
    }

    /// Highlighted day of the open date picker
    pub fn selected_day() -> Locator {
        Locator::new(".react-datepicker__day--selected")
    }

    pub fn subject_input() -> Locator {
        Locator::new("#subjectsInput")
    }

    pub fn subject_option(subject: Subject) -> Locator {
        Locator::exact_text(subject.label())
    }

    pub fn hobby(hobby: Hobby) -> Locator {
        Locator::text(hobby.label())
    }

    pub fn picture() -> Locator {
        Locator::role("textbox", "Select picture")
    }

    pub fn current_address() -> Locator {
        Locator::role("textbox", "Current Address")
    }

    pub fn state_dropdown() -> Locator {
        Locator::text("Select State")
    }

    pub fn state_option(state: State) -> Locator {
        Locator::exact_text(state.label())
    }

    pub fn city_dropdown() -> Locator {
        Locator::text("Select City")
    }

    pub fn city_option(city: City) -> Locator {
        Locator::exact_text(city.label())
    }

    pub fn submit() -> Locator {
        Locator::role("button", "Submit")
    }

    pub fn confirmation() -> Locator {
        Locator::text("Thanks for submitting the form")
    }

    /// Value cell of a confirmation table row
    pub fn table_value(label: &str) -> Locator {
        Locator::xpath(format!("//tr[td[text()='{label}']]/td[2]"))
    }
}

/// Page object for the registration form
#[derive(Debug)]
pub struct RegistrationPage<'a> {
    page: &'a dyn Page,
    logger: &'a TestLogger,
    base_url: String,
    mode: AssertionMode,
}

impl<'a> RegistrationPage<'a> {
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

impl PageObject for RegistrationPage<'_> {
    fn url(&self) -> String {
        format!("{}{PATH}", self.base_url)
    }

    fn page_name(&self) -> &str {
        "Student Registration Form"
    }

    fn readiness(&self) -> crate::locator::Locator {
        locators::heading()
    }

    fn page(&self) -> &dyn Page {
        self.page
    }

    fn logger(&self) -> &TestLogger {
        self.logger
    }
}

#[async_trait]
impl FormPage for RegistrationPage<'_> {
    type Record = RegistrationRecord;

    async fn fill_form(&self, record: &RegistrationRecord) -> FormResult<()> {
        let page = self.page;
        self.logger.info(format!(
            "Filling registration form for {}",
            record.full_name()
        ));

        page.fill(&locators::first_name(), &record.first_name).await?;
        page.fill(&locators::last_name(), &record.last_name).await?;
        page.fill(&locators::email(), &record.email).await?;
        page.click(&locators::gender(record.gender)).await?;
        page.fill(&locators::mobile(), &record.mobile).await?;

        page.fill(&locators::date_of_birth(), &record.date_input()).await?;
        page.click(&locators::selected_day()).await?;

        page.fill(&locators::subject_input(), record.subject.query()).await?;
        page.click(&locators::subject_option(record.subject)).await?;

        let hobbies: Vec<_> = record.hobbies.iter().map(|h| locators::hobby(*h)).collect();
        activate_all(page, &hobbies).await?;
        self.logger
            .debug(format!("Selected hobbies: {}", record.hobbies_output()));

        page.set_input_files(&locators::picture(), &record.picture).await?;
        page.fill(&locators::current_address(), &record.current_address).await?;

        page.click(&locators::state_dropdown()).await?;
        page.click(&locators::state_option(record.state)).await?;
        page.click(&locators::city_dropdown()).await?;
        page.click(&locators::city_option(record.city)).await?;

        self.logger.info("Registration form filled");
        Ok(())
    }

    async fn submit_form(&self) -> FormResult<()> {
        self.logger.info("Submitting registration form");
        self.page.click(&locators::submit()).await
    }

    async fn validate_form_submission(&self, record: &RegistrationRecord) -> FormResult<()> {
        expect(self.page, &locators::confirmation()).to_be_visible().await?;
        self.logger.info("Confirmation shown, validating submitted values");

        let state_and_city = format!("{} {}", record.state.label(), record.city.label());
        let rows = [
            (STUDENT_NAME, record.full_name()),
            (STUDENT_EMAIL, record.email.clone()),
            (GENDER, record.gender.label().to_string()),
            (MOBILE, record.mobile.clone()),
            (DATE_OF_BIRTH, record.date_output()),
            (SUBJECTS, record.subject.label().to_string()),
            (HOBBIES, record.hobbies_output()),
            (PICTURE, record.picture_name()),
            (ADDRESS, record.current_address.clone()),
            (STATE_AND_CITY, state_and_city),
        ];

        let mut check = SubmissionCheck::new(self.page, self.logger, self.mode);
        for (label, expected) in &rows {
            check
                .field(label, &locators::table_value(label), expected)
                .await?;
        }
        check.finish()?;

        self.logger.info("Registration submission validated");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::data::{City, Gender, Hobby, RecordGenerator, State};
    use crate::logger::{memory_logger, TestPath};
    use crate::mock::MockPage;
    use crate::result::FormError;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn logger() -> TestLogger {
        memory_logger(TestPath::new("registration.rs", "Form Practice Page", "unit")).0
    }

    fn record() -> RegistrationRecord {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut record = RecordGenerator::with_rng(StdRng::seed_from_u64(42))
            .on(today)
            .registration();
        record.gender = Gender::Female;
        record.hobbies = vec![Hobby::Music, Hobby::Reading];
        record.state = State::Ncr;
        record.city = City::Delhi;
        record
    }

    #[test]
    fn test_table_value_xpath() {
        assert_eq!(
            locators::table_value("Gender").to_string(),
            "locator('//tr[td[text()='Gender']]/td[2]')"
        );
    }

    #[test]
    fn test_url_uses_base() {
        let page = MockPage::new();
        let logger = logger();
        let form = RegistrationPage::new(&page, &logger).with_base_url("http://localhost:8080/");
        assert_eq!(form.url(), "http://localhost:8080/automation-practice-form");
    }

    #[tokio::test]
    async fn test_full_round_trip() {
        let page = MockPage::demoqa();
        let logger = logger();
        let form = RegistrationPage::new(&page, &logger);
        let record = record();

        form.navigate().await.unwrap();
        form.fill_form(&record).await.unwrap();
        form.submit_form().await.unwrap();
        form.validate_form_submission(&record).await.unwrap();

        let handle = page.handle();
        assert_eq!(
            handle.text_of(&locators::table_value(HOBBIES)).as_deref(),
            Some("Music, Reading")
        );
        assert_eq!(
            handle.text_of(&locators::table_value(GENDER)).as_deref(),
            Some("Female")
        );
        assert_eq!(
            handle.text_of(&locators::table_value(STATE_AND_CITY)).as_deref(),
            Some("NCR Delhi")
        );
    }

    #[tokio::test]
    async fn test_navigate_to_wrong_page_is_navigation_error() {
        let page = MockPage::demoqa();
        let logger = logger();
        let form = RegistrationPage::new(&page, &logger).with_base_url("https://demoqa.com/missing");
        let err = form.navigate().await.unwrap_err();
        assert!(matches!(err, FormError::Navigation { .. }));
    }

    #[tokio::test]
    async fn test_validation_without_submit_times_out() {
        let page = MockPage::demoqa();
        let logger = logger();
        let form = RegistrationPage::new(&page, &logger);
        form.navigate().await.unwrap();
        let err = form.validate_form_submission(&record()).await.unwrap_err();
        assert!(matches!(err, FormError::Timeout { .. }));
        assert!(err.to_string().contains("Thanks for submitting the form"));
    }

    #[tokio::test]
    async fn test_mismatch_names_field() {
        let page = MockPage::demoqa();
        let logger = logger();
        let form = RegistrationPage::new(&page, &logger);
        let submitted = record();
        form.navigate().await.unwrap();
        form.fill_form(&submitted).await.unwrap();
        form.submit_form().await.unwrap();

        let mut expected = submitted.clone();
        expected.mobile = "0000000000".into();
        let err = form.validate_form_submission(&expected).await.unwrap_err();
        match err {
            FormError::Assertion(m) => {
                assert_eq!(m.field, MOBILE);
                assert_eq!(m.received, Some(submitted.mobile));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
