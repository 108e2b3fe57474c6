//! Error types for the labor calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing statutory figures.
//! Errors fall into two classes: validation errors (the caller supplied
//! missing or out-of-range input) and computation errors (arithmetic that
//! could not be completed, such as a division by zero).

use thiserror::Error;

/// The main error type for the labor calculation engine.
///
/// Every calculator returns this error type instead of producing NaN,
/// infinity or a partial result.
///
/// # Example
///
/// ```
/// use labor_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "years_of_service".to_string(),
///     message: "must be at least 1".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid input 'years_of_service': must be at least 1"
/// );
/// assert!(error.is_validation());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input field was missing, negative or otherwise out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A date or month-day string could not be parsed.
    #[error("Invalid date for '{field}': {value}")]
    InvalidDate {
        /// The field holding the date.
        field: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// No statutory minimum wage is configured for the requested year.
    #[error("Minimum wage not found for year {year}")]
    MinimumWageNotFound {
        /// The requested year.
        year: i32,
    },

    /// A saved calculation does not exist for the given user.
    #[error("Saved calculation not found: {id}")]
    RecordNotFound {
        /// The requested record id.
        id: String,
    },

    /// Arithmetic could not be completed (division by zero, overflow).
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors caused by caller input rather than by the engine.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InvalidDate { .. } | Self::MinimumWageNotFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
