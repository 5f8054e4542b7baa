//! The suite's scenarios as reusable test bodies.
//!
//! Integration tests run them against [`MockPage`](crate::mock::MockPage);
//! the CLI runs them against Chromium. Either way each scenario executes
//! inside a [`TestFixture`] that owns its page.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::browser::Page;
use crate::config::SuiteConfig;
use crate::data::{City, Gender, Hobby, RecordGenerator, State};
use crate::fixture::{TestContext, TestFixture, TestOutcome};
use crate::logger::TestPath;
use crate::page_object::{AssertionMode, FormPage};
use crate::pages::{RegistrationPage, TextBoxPage};
use crate::result::FormResult;

pub const REGISTRATION_SUITE: &str = "Form Practice Page";
pub const TEXT_BOX_SUITE: &str = "Text Box Page";
pub const VALID_DATA_TITLE: &str = "should fill the form with valid data";

/// Per-run settings a scenario body needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSettings {
    pub base_url: String,
    pub mode: AssertionMode,
}

impl ScenarioSettings {
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            mode: config.assertion_mode,
        }
    }
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self::from_config(&SuiteConfig::default())
    }
}

/// A runnable scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    RegistrationForm,
    TextBox,
}

impl Scenario {
    pub const ALL: [Self; 2] = [Self::RegistrationForm, Self::TextBox];

    /// Identity used for logging and reporting
    #[must_use]
    pub fn path(self) -> TestPath {
        match self {
            Self::RegistrationForm => {
                TestPath::new("form_spec.rs", REGISTRATION_SUITE, VALID_DATA_TITLE)
            }
            Self::TextBox => TestPath::new("text_box_spec.rs", TEXT_BOX_SUITE, VALID_DATA_TITLE),
        }
    }

    /// Body of the scenario, shaped for [`TestFixture::run`]
    pub fn body(self, ctx: &TestContext, settings: ScenarioSettings) -> BoxFuture<'_, FormResult<()>> {
        async move {
            match self {
                Self::RegistrationForm => registration_form_submission(ctx, &settings).await,
                Self::TextBox => text_box_submission(ctx, &settings).await,
            }
        }
        .boxed()
    }

    /// Run the scenario on `page` under a fresh fixture
    pub async fn run(self, page: Box<dyn Page>, config: &SuiteConfig) -> TestOutcome {
        let settings = ScenarioSettings::from_config(config);
        TestFixture::new(self.path(), page)
            .with_log_config(config.log.clone())
            .run(move |ctx| self.body(ctx, settings))
            .await
    }
}

/// Fill the registration form with a generated student who is female, likes
/// music and reading, and lives in Delhi, NCR; then check the confirmation.
pub async fn registration_form_submission(
    ctx: &TestContext,
    settings: &ScenarioSettings,
) -> FormResult<()> {
    let mut record = RecordGenerator::new()
        .with_logger(ctx.logger())
        .registration();
    record.gender = Gender::Female;
    record.hobbies = vec![Hobby::Music, Hobby::Reading];
    record.state = State::Ncr;
    record.city = City::Delhi;

    let form = RegistrationPage::new(ctx.page(), ctx.logger())
        .with_base_url(settings.base_url.as_str())
        .with_assertion_mode(settings.mode);
    form.navigate().await?;
    form.fill_form(&record).await?;
    form.submit_form().await?;
    form.validate_form_submission(&record).await
}

/// Fill the text box form with the same current and permanent address and
/// check both outputs.
pub async fn text_box_submission(ctx: &TestContext, settings: &ScenarioSettings) -> FormResult<()> {
    let mut record = RecordGenerator::new().with_logger(ctx.logger()).text_box();
    record.permanent_address.clone_from(&record.current_address);

    let form = TextBoxPage::new(ctx.page(), ctx.logger())
        .with_base_url(settings.base_url.as_str())
        .with_assertion_mode(settings.mode);
    form.navigate().await?;
    form.fill_form(&record).await?;
    form.submit_form().await?;
    form.validate_form_submission(&record).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use crate::logger::memory_logger;
    use crate::mock::MockPage;

    #[test]
    fn test_paths() {
        assert_eq!(
            Scenario::RegistrationForm.path().to_string(),
            "form_spec.rs > Form Practice Page > should fill the form with valid data"
        );
        assert_eq!(Scenario::TextBox.path().suite, TEXT_BOX_SUITE);
    }

    #[tokio::test]
    async fn test_every_scenario_passes_on_mock_site() {
        for scenario in Scenario::ALL {
            let page = MockPage::demoqa();
            let handle = page.handle();
            let outcome = TestFixture::new(scenario.path(), Box::new(page))
                .with_log_config(LogConfig::default().with_console(false))
                .with_logger(memory_logger(scenario.path()).0)
                .run(|ctx| scenario.body(ctx, ScenarioSettings::default()))
                .await;
            assert!(outcome.passed(), "{scenario:?}: {:?}", outcome.error);
            assert!(handle.is_closed());
        }
    }
}
