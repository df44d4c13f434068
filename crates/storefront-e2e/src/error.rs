// Error types for storefront page objects
//
// Two layers:
// - DriverError: a fault reported by the browser driver (Playwright or a test double)
// - Error: the page-object failure that wraps a driver fault with the step that failed

use std::time::Duration;
use thiserror::Error;

/// Result type alias for page-object operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for raw driver capabilities
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Faults raised by the browser driver underneath the page objects
#[derive(Debug, Error)]
pub enum DriverError {
    /// Error reported by the Playwright bindings
    #[error(transparent)]
    Playwright(#[from] playwright_rs::Error),

    /// A polled condition did not hold before the wait policy ran out
    #[error("Timeout after {timeout:?} waiting for {condition}")]
    Timeout { condition: String, timeout: Duration },

    /// The dialog listener went away before a dialog arrived
    #[error("Dialog listener dropped before a dialog was handled")]
    DialogListenerClosed,

    /// Any other driver-level failure
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by page objects
///
/// Each variant names the step that failed. Variants wrapping a driver fault keep it
/// as the error source and repeat its message, so the rendered error reads as
/// "what we tried: why the driver refused".
#[derive(Debug, Error)]
pub enum Error {
    /// Navigation to a URL was rejected
    #[error("Failed to navigate to {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: DriverError,
    },

    /// The document-ready signal never fired
    #[error("Failed to wait for page load: {0}")]
    PageLoad(#[source] DriverError),

    /// The element never became visible
    #[error("Element not found or not visible: {0}")]
    ElementNotVisible(#[source] DriverError),

    /// The element could not be clicked
    #[error("Failed to click element: {0}")]
    ElementNotClickable(#[source] DriverError),

    /// The input could not be filled
    #[error("Failed to fill input with text \"{text}\": {source}")]
    Fill {
        text: String,
        #[source]
        source: DriverError,
    },

    /// Reading the element text failed
    #[error("Failed to get text from element: {0}")]
    TextRetrieval(#[source] DriverError),

    /// The visibility query itself failed
    #[error("Failed to check if element is visible: {0}")]
    VisibilityCheck(#[source] DriverError),

    /// Any other driver call (checkbox, select, count, attribute, dialog, close)
    #[error("Failed to {operation}: {source}")]
    Driver {
        operation: &'static str,
        #[source]
        source: DriverError,
    },

    /// Required input was missing or blank
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Menu positions are 1-based
    #[error("Position must be greater than 0, got {0}")]
    InvalidPosition(i64),

    /// Text that should hold a number did not
    #[error("Invalid {what} format: {text:?}")]
    Parse { what: &'static str, text: String },

    /// Playwright or the browser could not be started
    #[error("Failed to launch browser session: {0}")]
    Launch(#[source] DriverError),

    /// Invalid configuration value
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns the innermost error, looking through any context layers
    pub fn root(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

/// Attaches page-level context to a failed step
pub(crate) trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(msg))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
