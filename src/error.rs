//! Centralized error handling for dashlab.
//!
//! Analysis operations report two kinds of failure:
//!
//! - **Hard failures** are returned as [`AnalysisError`]. They mean the caller asked
//!   for something that cannot exist: a column that is not in the dataset, an empty
//!   selection, a date column that does not parse. Retrying with the same input
//!   fails the same way.
//! - **Soft failures** are not errors at all. An all-missing column or a series that
//!   is too short to decompose is a valid outcome and comes back as
//!   [`Outcome::Unavailable`](crate::analyser::logic::types::Outcome).
//!
//! ```
//! use dashlab::error::AnalysisError;
//!
//! fn describe(err: &AnalysisError) -> String {
//!     match err {
//!         AnalysisError::ColumnNotFound(name) => format!("pick another column than {name}"),
//!         AnalysisError::InvalidInput(msg) => format!("bad request: {msg}"),
//!         other => other.to_string(),
//!     }
//! }
//! ```
//!
//! `ResultExt` adds `.context()` to any result whose error converts into
//! [`AnalysisError`]:
//!
//! ```no_run
//! use dashlab::error::ResultExt as _;
//!
//! fn read_settings() -> dashlab::error::Result<String> {
//!     let raw = std::fs::read_to_string("config.json").context("Failed to read settings")?;
//!     Ok(raw)
//! }
//! ```

use std::fmt;

/// Main error type for dashlab operations.
#[derive(Debug)]
pub enum AnalysisError {
    /// A requested column is not part of the dataset
    ColumnNotFound(String),

    /// The request or the dataset has the wrong shape
    InvalidInput(String),

    /// I/O errors (file loading, config files)
    Io(std::io::Error),

    /// Polars failures outside an analysis boundary (loading, dataset construction)
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "Column '{name}' not found in dataset"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl AnalysisError {
    /// True for errors caused by the caller's column selection or arguments.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::ColumnNotFound(_) | Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for AnalysisError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

// Presentation layers render errors as plain messages
impl From<AnalysisError> for String {
    fn from(err: AnalysisError) -> Self {
        err.to_string()
    }
}

/// Result type alias for dashlab operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", f(), err))
        })
    }
}
