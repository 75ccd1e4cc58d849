//! Response types for the payroll engine API.
//!
//! This module defines the deduction breakdown response and the error
//! response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::models::{AuditStep, DeductionAmounts};

/// Response body for the `/deductions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionsResponse {
    /// The date requested.
    pub effective_date: NaiveDate,
    /// Effective date of the schedule that was applied.
    pub schedule_effective_date: NaiveDate,
    /// Monthly deductions.
    pub monthly: DeductionAmounts,
    /// Weekly-equivalent deductions.
    pub weekly: DeductionAmounts,
    /// How each deduction was derived.
    pub audit_steps: Vec<AuditStep>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a schedule not found error response.
    pub fn schedule_not_found(date: NaiveDate) -> Self {
        Self::with_details(
            "SCHEDULE_NOT_FOUND",
            format!("No statutory schedule in effect on {}", date),
            "Payroll can only be computed for months on or after the earliest configured schedule",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        match error {
            PayrollError::ScheduleNotFound { date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::schedule_not_found(date),
            },
            PayrollError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            PayrollError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            PayrollError::InputNotFound { path } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INPUT_NOT_FOUND",
                    "Input file not found",
                    path,
                ),
            },
            PayrollError::InputParseError { path, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INPUT_PARSE_ERROR",
                    format!("Failed to read input '{}'", path),
                    message,
                ),
            },
            PayrollError::ExportFailed { target, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "EXPORT_FAILED",
                    format!("Failed to export to '{}'", target),
                    message,
                ),
            },
            // Amounts too large for the decimal range.
            PayrollError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "CALCULATION_ERROR",
                    "Calculation failed",
                    message,
                ),
            },
        }
    }
}
