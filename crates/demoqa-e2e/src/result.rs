//! Result and error types for the suite.
//!
//! Locator and assertion errors render as several lines that start with
//! `Error:`, `Timed out`, `Locator:`, `Expected` or `Received`, the same shape
//! the fixture keeps when it condenses a failure into one log line.

use std::fmt;
use thiserror::Error;

/// Result type for suite operations
pub type FormResult<T> = Result<T, FormError>;

/// A value mismatch found while validating a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Field (or assertion) the mismatch belongs to
    pub field: String,
    /// Description of the locator that was read
    pub locator: String,
    /// Substring that was expected in the element text
    pub expected: String,
    /// Text that was actually found, `None` when the element never resolved
    pub received: Option<String>,
}

impl Mismatch {
    /// Create a mismatch for a named field
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        locator: impl Into<String>,
        expected: impl Into<String>,
        received: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            locator: locator.into(),
            expected: expected.into(),
            received,
        }
    }

    /// Rename the field this mismatch is reported under
    #[must_use]
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Error: expect(locator).toContainText(expected) failed for '{}'",
            self.field
        )?;
        writeln!(f, "Locator: {}", self.locator)?;
        writeln!(f, "Expected substring: {:?}", self.expected)?;
        match &self.received {
            Some(text) => write!(f, "Received string: {text:?}"),
            None => write!(f, "Received: <element(s) not found>"),
        }
    }
}

/// Errors that can occur while driving the demo forms
#[derive(Debug, Error)]
pub enum FormError {
    /// Browser launch error
    #[error("Error: failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Generic page error reported by the automation backend
    #[error("Error: page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// The page session was already released
    #[error("Error: page has been closed")]
    PageClosed,

    /// Navigation failed or the readiness signal never appeared
    #[error("Error: navigation to {url} failed\n{message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait ran out of time
    #[error("Timed out {ms}ms waiting for locator\nLocator: {locator}")]
    Timeout {
        /// Locator description
        locator: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Locator matched no element
    #[error("Error: element not found\nLocator: {locator}")]
    ElementNotFound {
        /// Locator description
        locator: String,
    },

    /// Strict locator matched more than one element
    #[error("Error: strict mode violation, locator resolved to {count} elements\nLocator: {locator}")]
    AmbiguousLocator {
        /// Locator description
        locator: String,
        /// Number of matched elements
        count: usize,
    },

    /// Element exists but cannot be interacted with
    #[error("Error: element is not interactable: {message}\nLocator: {locator}")]
    ElementNotInteractable {
        /// Locator description
        locator: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Error: screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Single assertion mismatch
    #[error("{0}")]
    Assertion(Box<Mismatch>),

    /// Several assertion mismatches collected in one validation pass
    #[error("{}", join_mismatches(.0))]
    Assertions(Vec<Mismatch>),

    /// Credential key absent from the store
    #[error("Error: no credentials found ({key} missing)! Run the register test first.")]
    CredentialMissing {
        /// Missing key
        key: String,
    },

    /// Test finished in the failed state
    #[error("Error: test '{name}' failed\n{message}")]
    TestFailed {
        /// Test title path
        name: String,
        /// Raw failure text
        message: String,
    },

    /// I/O error
    #[error("Error: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("Error: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    /// Wrap a single mismatch
    #[must_use]
    pub fn assertion(mismatch: Mismatch) -> Self {
        Self::Assertion(Box::new(mismatch))
    }

    /// True for value mismatches (as opposed to locator or browser failures)
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_) | Self::Assertions(_))
    }
}

fn join_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_display_lines() {
        let m = Mismatch::new("Gender", "xpath=//td", "Female", Some("Male".into()));
        let text = m.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Error"));
        assert_eq!(lines[1], "Locator: xpath=//td");
        assert_eq!(lines[2], "Expected substring: \"Female\"");
        assert_eq!(lines[3], "Received string: \"Male\"");
    }

    #[test]
    fn test_mismatch_not_found() {
        let m = Mismatch::new("Hobbies", "css=#x", "Music", None);
        assert!(m.to_string().ends_with("Received: <element(s) not found>"));
    }

    #[test]
    fn test_assertions_joined() {
        let err = FormError::Assertions(vec![
            Mismatch::new("a", "l", "x", None),
            Mismatch::new("b", "l", "y", None),
        ]);
        assert_eq!(err.to_string().lines().count(), 8);
        assert!(err.is_assertion());
    }

    #[test]
    fn test_timeout_message() {
        let err = FormError::Timeout {
            locator: "getByText('Thanks')".into(),
            ms: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Timed out 5000ms waiting for locator\nLocator: getByText('Thanks')"
        );
        assert!(!err.is_assertion());
    }
}
