//! Locator abstraction for element selection and text assertions.
//!
//! A [`Locator`] is a deferred reference: it carries a [`Selector`] and is
//! resolved against the live page each time an action or assertion runs.
//!
//! - **Auto-Waiting**: actions and [`Expect`] poll until the element is ready
//!   or the timeout elapses
//! - **Strict Selection**: fails if multiple elements match unless strictness
//!   is switched off
//! - **Playwright-shaped descriptions**: `Display` renders the selector the way
//!   failure logs quote it (`getByRole('textbox', { name: 'Full Name' })`)

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::browser::Page;
use crate::result::{FormError, FormResult, Mismatch};

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "#permanentAddress")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Innermost element whose text equals (`exact`) or contains `text`
    Text {
        /// Text to match
        text: String,
        /// Require the trimmed text to be equal instead of containing it
        exact: bool,
    },
    /// ARIA role with an accessible name (matched case-insensitively as a substring)
    Role {
        /// Role name, e.g. "textbox", "button", "heading"
        role: String,
        /// Accessible name
        name: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>, exact: bool) -> Self {
        Self::Text {
            text: text.into(),
            exact,
        }
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// JavaScript expression evaluating to the array of matching elements
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({}))", js_str(s)),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                 return out; }})()",
                js_str(s)
            ),
            Self::Text { text, exact } => format!(
                "(() => {{ const want = {}; const exact = {exact}; \
                 const m = el => {{ const c = (el.textContent || '').replace(/\\s+/g, ' ').trim(); \
                 return exact ? c === want : c.includes(want); }}; \
                 return Array.from(document.querySelectorAll('body *')) \
                 .filter(el => m(el) && !Array.from(el.children).some(m)); }})()",
                js_str(text)
            ),
            Self::Role { role, name } => format!(
                "(() => {{ const role = {}; const want = {}.toLowerCase(); \
                 const norm = s => (s || '').replace(/\\s+/g, ' ').trim().toLowerCase(); \
                 const roles = {{ \
                   textbox: 'input:not([type]), input[type=text], input[type=email], input[type=tel], \
                     input[type=url], input[type=search], input[type=password], input[type=file], textarea', \
                   button: 'button, input[type=submit], input[type=button], [role=button]', \
                   heading: 'h1, h2, h3, h4, h5, h6, [role=heading]', \
                   checkbox: 'input[type=checkbox], [role=checkbox]', \
                   radio: 'input[type=radio], [role=radio]' }}; \
                 const name = el => {{ \
                   if (el.getAttribute('aria-label')) return el.getAttribute('aria-label'); \
                   if (el.id) {{ const l = document.querySelector('label[for=\"' + CSS.escape(el.id) + '\"]'); \
                     if (l) return l.textContent; }} \
                   if (el.closest('label')) return el.closest('label').textContent; \
                   return el.getAttribute('placeholder') || el.textContent || el.value; }}; \
                 return Array.from(document.querySelectorAll(roles[role] || '[role=\"' + role + '\"]')) \
                 .filter(el => norm(name(el)).includes(want)); }})()",
                js_str(role),
                js_str(name)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) | Self::XPath(s) => write!(f, "locator('{s}')"),
            Self::Text { text, exact: true } => write!(f, "getByText('{text}', {{ exact: true }})"),
            Self::Text { text, exact: false } => write!(f, "getByText('{text}')"),
            Self::Role { role, name } => write!(f, "getByRole('{role}', {{ name: '{name}' }})"),
        }
    }
}

fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Locator options for customizing behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting, `None` uses the page default
    pub timeout: Option<Duration>,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
    /// Whether to require strict single-element match
    pub strict: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            strict: true,
        }
    }
}

/// A deferred reference to an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// `getByRole(role, { name })`
    #[must_use]
    pub fn role(role: &str, name: &str) -> Self {
        Self::from_selector(Selector::role(role, name))
    }

    /// `getByText(text)`
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::from_selector(Selector::text(text, false))
    }

    /// `getByText(text, { exact: true })`
    #[must_use]
    pub fn exact_text(text: &str) -> Self {
        Self::from_selector(Selector::text(text, true))
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::from_selector(Selector::xpath(expr))
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Disable strict mode (allow multiple matches, first one wins)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Timeout to use against a given page
    #[must_use]
    pub fn timeout_on(&self, page: &dyn Page) -> Duration {
        self.options.timeout.unwrap_or_else(|| page.default_timeout())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

/// Auto-retrying assertion builder for locators (Playwright's `expect()`)
#[derive(Debug)]
pub struct Expect<'p> {
    page: &'p dyn Page,
    locator: Locator,
    timeout: Duration,
}

impl<'p> Expect<'p> {
    /// Create a new expectation for a locator on a page
    #[must_use]
    pub fn new(page: &'p dyn Page, locator: &Locator) -> Self {
        Self {
            page,
            timeout: locator.timeout_on(page),
            locator: locator.clone(),
        }
    }

    /// Override the retry timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait until the element is present and visible
    pub async fn to_be_visible(&self) -> FormResult<()> {
        self.page.wait_for(&self.locator, self.timeout).await
    }

    /// Poll the element text until it contains `expected` or the timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Assertion`] with the last received text on timeout;
    /// other page errors propagate unchanged.
    pub async fn to_contain_text(&self, expected: &str) -> FormResult<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let received = match self.page.text_content(&self.locator).await {
                Ok(text) => Some(text),
                Err(FormError::ElementNotFound { .. } | FormError::Timeout { .. }) => None,
                Err(e) => return Err(e),
            };

            if received.as_deref().is_some_and(|t| t.contains(expected)) {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(FormError::assertion(Mismatch::new(
                    "expect(locator).toContainText",
                    self.locator.to_string(),
                    expected,
                    received,
                )));
            }
            tokio::time::sleep(self.locator.options().poll_interval).await;
        }
    }
}

/// Create an expectation for a locator (Playwright-style)
#[must_use]
pub fn expect<'p>(page: &'p dyn Page, locator: &Locator) -> Expect<'p> {
    Expect::new(page, locator)
}
