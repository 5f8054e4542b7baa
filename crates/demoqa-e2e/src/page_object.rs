//! Page Object Model support.
//!
//! A page object binds the locators and interactions of one screen. It
//! borrows the page session and the test's logger, so it can never outlive
//! the fixture that owns them.

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::browser::Page;
use crate::locator::{expect, Locator};
use crate::logger::TestLogger;
use crate::result::{FormError, FormResult, Mismatch};

/// How a validation pass reports value mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssertionMode {
    /// Stop at the first mismatch (default)
    #[default]
    FailFast,
    /// Check every field, then report all mismatches together
    Collect,
}

/// Static description of a page plus the session it is bound to.
pub trait PageObject {
    /// Absolute URL of the page
    fn url(&self) -> String;

    /// Human-readable name for logs
    fn page_name(&self) -> &str;

    /// Time allowed for the readiness signal after navigation (in milliseconds)
    fn load_timeout_ms(&self) -> u64 {
        30000
    }

    /// Element whose visibility means the page is usable
    fn readiness(&self) -> Locator;

    /// Page session
    fn page(&self) -> &dyn Page;

    /// Test logger
    fn logger(&self) -> &TestLogger;
}

/// A page whose workflow is fill, submit, then validate.
#[async_trait]
pub trait FormPage: PageObject + Sync {
    /// Values the form accepts
    type Record: Sync;

    /// Open the page and wait for its readiness signal.
    ///
    /// # Errors
    ///
    /// [`FormError::Navigation`] when loading fails or the readiness signal
    /// does not appear within [`PageObject::load_timeout_ms`].
    async fn navigate(&self) -> FormResult<()> {
        let url = self.url();
        self.logger()
            .info(format!("Navigating to {} ({url})", self.page_name()));
        self.page().goto(&url).await?;

        let timeout = std::time::Duration::from_millis(self.load_timeout_ms());
        match self.page().wait_for(&self.readiness(), timeout).await {
            Ok(()) => {
                self.logger().debug(format!("{} is ready", self.page_name()));
                Ok(())
            }
            Err(e @ FormError::Timeout { .. }) => Err(FormError::Navigation {
                url,
                message: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Enter every field of `record`
    async fn fill_form(&self, record: &Self::Record) -> FormResult<()>;

    /// Submit the form
    async fn submit_form(&self) -> FormResult<()>;

    /// Check that the page reflects every field of `record`
    async fn validate_form_submission(&self, record: &Self::Record) -> FormResult<()>;
}

/// Click every locator concurrently; fails as a whole if any click fails.
pub async fn activate_all(page: &dyn Page, locators: &[Locator]) -> FormResult<()> {
    try_join_all(locators.iter().map(|locator| page.click(locator))).await?;
    Ok(())
}

/// Field-by-field `toContainText` checks over one submitted form
#[derive(Debug)]
pub struct SubmissionCheck<'a> {
    page: &'a dyn Page,
    logger: &'a TestLogger,
    mode: AssertionMode,
    mismatches: Vec<Mismatch>,
}

impl<'a> SubmissionCheck<'a> {
    /// Start a validation pass
    #[must_use]
    pub const fn new(page: &'a dyn Page, logger: &'a TestLogger, mode: AssertionMode) -> Self {
        Self {
            page,
            logger,
            mode,
            mismatches: Vec::new(),
        }
    }

    /// Expect the element behind `locator` to contain `expected`.
    ///
    /// In [`AssertionMode::FailFast`] the first mismatch is returned
    /// immediately; in [`AssertionMode::Collect`] it is kept for
    /// [`SubmissionCheck::finish`]. Page errors always propagate.
    pub async fn field(&mut self, field: &str, locator: &Locator, expected: &str) -> FormResult<()> {
        match expect(self.page, locator).to_contain_text(expected).await {
            Ok(()) => {
                self.logger.debug(format!("{field} shows {expected:?}"));
                Ok(())
            }
            Err(FormError::Assertion(mismatch)) => {
                let mismatch = (*mismatch).for_field(field);
                self.logger.warn(format!(
                    "{field} mismatch: expected {:?}, received {:?}",
                    mismatch.expected, mismatch.received
                ));
                match self.mode {
                    AssertionMode::FailFast => Err(FormError::assertion(mismatch)),
                    AssertionMode::Collect => {
                        self.mismatches.push(mismatch);
                        Ok(())
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Mismatches collected so far
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Close the pass, reporting collected mismatches
    pub fn finish(mut self) -> FormResult<()> {
        match self.mismatches.len() {
            0 => Ok(()),
            1 => Err(FormError::assertion(self.mismatches.remove(0))),
            _ => Err(FormError::Assertions(self.mismatches)),
        }
    }
}
