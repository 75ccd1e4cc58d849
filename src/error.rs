//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts a stage of a payroll run. Conditions that
//! only affect a single input row are not errors; they are recorded as
//! [`PayrollWarning`](crate::models::PayrollWarning)s and the row is skipped.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::InputNotFound {
///     path: "employee_logs.csv".to_string(),
/// };
/// assert_eq!(error.to_string(), "Input file not found: employee_logs.csv");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No statutory schedule is in effect on the requested date.
    #[error("No statutory schedule in effect on {date}")]
    ScheduleNotFound {
        /// The date for which a schedule was requested.
        date: NaiveDate,
    },

    /// An input file required by the current stage does not exist.
    #[error("Input file not found: {path}")]
    InputNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An input file exists but could not be read as a delimited file.
    #[error("Failed to read input file '{path}': {message}")]
    InputParseError {
        /// The path to the input file.
        path: String,
        /// A description of the read error.
        message: String,
    },

    /// Writing an export failed.
    #[error("Failed to export to '{target}': {message}")]
    ExportFailed {
        /// The export destination.
        target: String,
        /// A description of the write error.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
