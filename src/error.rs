//! Error types for candidate analysis.
//!
//! The analysis distinguishes three outcome families and only one of them is
//! an error:
//!
//! - *Invalid-argument*: a required input is absent or empty. Programmer
//!   error; aborts the current analysis call via [`AnalysisError`].
//! - *Not-found*: a positional or structural search has no match. Expected
//!   outcome; modeled as `Option` sentinels in [`crate::tree`].
//! - *Structural-invalid*: a candidate fails a behavior-preservation or
//!   completeness rule. Data outcome; modeled as the boolean result of
//!   [`crate::validate::ExtractabilityCheck`], never an error.

use thiserror::Error;

/// Errors raised by the candidate analysis engine.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required input was absent or empty (bad input from caller).
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },
}

impl AnalysisError {
    /// Build an invalid-arguments error from any displayable message.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        AnalysisError::InvalidArguments {
            message: message.into(),
        }
    }
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
