//! demoqa-e2e: browser end-to-end tests for the DemoQA demo forms
//!
//! The suite drives the Student Registration Form and the Text Box form
//! through page objects, fills them with generated data, and checks what the
//! site echoes back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ TestFixture  │──►│  Scenario    │──►│ Page object  │──►│ dyn Page     │
//! │ logger, hooks│   │ body         │   │ locators     │   │ CDP or mock  │
//! └──────┬───────┘   └──────┬───────┘   └──────────────┘   └──────────────┘
//!        │                  │
//!        ▼                  ▼
//! ┌──────────────┐   ┌──────────────┐
//! │ Reporter     │   │ Record       │
//! │ Allure files │   │ generator    │
//! └──────────────┘   └──────────────┘
//! ```
//!
//! Enable the `browser` feature to run against Chromium; without it every
//! scenario still runs against [`MockPage`], which simulates both forms.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod browser;
mod config;
mod credentials;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod data;
mod fixture;
mod locator;
mod logger;
/// Scripted in-process page for tests
#[allow(missing_docs)]
pub mod mock;
mod page_object;
/// Page objects for the two demo forms
#[allow(missing_docs)]
pub mod pages;
mod reporter;
mod result;
/// Reusable scenario bodies
#[allow(missing_docs)]
pub mod scenarios;

#[cfg(feature = "browser")]
pub use browser::{Browser, CdpPage};
pub use browser::{BrowserConfig, Page};
pub use config::{LogConfig, ReportConfig, SuiteConfig, DEFAULT_BASE_URL, UNKNOWN_ENVIRONMENT};
pub use credentials::{CredentialStore, Credentials, PASSWORD_KEY, USERNAME_KEY};
pub use data::{
    birth_date_bounds, is_valid_email, picture_asset, City, Gender, Hobby, RecordGenerator, RegistrationRecord, State, Subject,
    TextBoxRecord, MAX_AGE_YEARS, MIN_AGE_YEARS, MOBILE_LEN,
};
pub use fixture::{
    format_failure_message, Attachment, TestContext, TestFixture, TestOutcome, TestPhase,
    TestStatus, FAILURE_SCREENSHOT, MISSING_ERROR, PNG_CONTENT_TYPE,
};
pub use locator::{
    expect, Expect, Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};
pub use logger::{
    file_contains, memory_logger, sanitize_suite, MemoryWriter, RollingFile, SharedFile,
    TestLogger, TestPath,
};
pub use page_object::{activate_all, AssertionMode, FormPage, PageObject, SubmissionCheck};
pub use reporter::{
    prepare_results_dir, PrepareSummary, Reporter, CATEGORIES_FILE, ENVIRONMENT_FILE, HISTORY_DIR,
};
pub use result::{FormError, FormResult, Mismatch};
pub use scenarios::{Scenario, ScenarioSettings};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::data::{RecordGenerator, RegistrationRecord, TextBoxRecord};
    pub use super::fixture::{TestContext, TestFixture, TestOutcome};
    pub use super::locator::{expect, Locator};
    pub use super::logger::{TestLogger, TestPath};
    pub use super::page_object::{AssertionMode, FormPage, PageObject};
    pub use super::pages::{RegistrationPage, TextBoxPage};
    pub use super::result::{FormError, FormResult};
    pub use super::{Page, SuiteConfig};
}
