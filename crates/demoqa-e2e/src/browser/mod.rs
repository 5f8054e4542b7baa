//! Browser control.
//!
//! Page objects and fixtures only see the [`Page`] trait. With the `browser`
//! feature the trait is backed by a real Chromium page over the Chrome
//! `DevTools` Protocol; [`crate::mock::MockPage`] backs it in unit and
//! integration tests.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::locator::{Locator, DEFAULT_TIMEOUT_MS};
use crate::result::FormResult;

#[cfg(feature = "browser")]
mod cdp;

#[cfg(feature = "browser")]
pub use cdp::{Browser, CdpPage};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Default auto-wait timeout for locator actions and assertions
    pub action_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            action_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the default action timeout
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }
}

/// A live page session owned by exactly one test.
///
/// Every interaction re-resolves its locator. Actions (`fill`, `click`,
/// `set_input_files`) auto-wait up to [`Page::default_timeout`] (or the
/// locator's own timeout) for a single interactable match; `text_content` is a
/// single read and leaves retrying to [`crate::locator::Expect`].
#[async_trait]
pub trait Page: Send + Sync + fmt::Debug {
    /// Navigate to a URL
    async fn goto(&self, url: &str) -> FormResult<()>;

    /// Wait until the locator resolves to a visible element
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> FormResult<()>;

    /// Replace the value of an input with `value`
    async fn fill(&self, locator: &Locator, value: &str) -> FormResult<()>;

    /// Click the element
    async fn click(&self, locator: &Locator) -> FormResult<()>;

    /// Attach a local file to a file input
    async fn set_input_files(&self, locator: &Locator, path: &Path) -> FormResult<()>;

    /// Current text content of the element
    async fn text_content(&self, locator: &Locator) -> FormResult<String>;

    /// Capture a PNG screenshot
    async fn screenshot(&self, full_page: bool) -> FormResult<Vec<u8>>;

    /// Release the page session
    async fn close(&self) -> FormResult<()>;

    /// URL of the last navigation
    fn current_url(&self) -> String;

    /// Auto-wait budget for actions and assertions
    fn default_timeout(&self) -> Duration {
        Duration::from_millis(DEFAULT_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.action_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_chain() {
        let config = BrowserConfig::default()
            .with_viewport(1920, 1080)
            .with_headless(false)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox()
            .with_action_timeout(Duration::from_secs(12));
        assert_eq!((config.viewport_width, config.viewport_height), (1920, 1080));
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.action_timeout, Duration::from_secs(12));
    }
}
