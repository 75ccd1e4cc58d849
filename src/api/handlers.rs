//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_statutory_deductions, run_payroll};
use crate::models::{Employee, TimePunch, WeeklyTimeRecord};

use super::request::{DeductionsRequest, PayrollRequest};
use super::response::{ApiError, ApiErrorResponse, DeductionsResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", post(payroll_handler))
        .route("/deductions", post(deductions_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a JSON extraction failure to an API error.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message is only in the body text
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /payroll.
///
/// Aggregates the supplied time data and returns the complete payroll run.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                rejection_error(correlation_id, rejection),
            );
        }
    };
    if let Err(message) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %message, "Payroll request rejected");
        return json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(message));
    }

    let employees: Vec<Employee> = request.employees.into_iter().map(Into::into).collect();
    let punches: Vec<TimePunch> = request.punches.into_iter().map(Into::into).collect();
    let weekly_records: Vec<WeeklyTimeRecord> =
        request.weekly_records.into_iter().map(Into::into).collect();

    let start_time = Instant::now();
    match run_payroll(&employees, &punches, weekly_records, state.config()) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %run.run_id,
                employees_count = run.employees.len(),
                lines_count = run.line_count(),
                warnings_count = run.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Payroll completed successfully"
            );
            json_response(StatusCode::OK, run)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /deductions.
///
/// Returns the monthly and weekly statutory deductions for a salary under
/// the schedule in effect on the requested date.
async fn deductions_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeductionsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing deductions request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                rejection_error(correlation_id, rejection),
            );
        }
    };
    if let Err(message) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %message, "Deductions request rejected");
        return json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(message));
    }

    let config = state.config();
    let schedule = match config.schedule_for(request.effective_date) {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                effective_date = %request.effective_date,
                "Statutory schedule not found"
            );
            return error_response(err.into());
        }
    };

    let deductions = calculate_statutory_deductions(
        request.monthly_base_rate,
        schedule,
        config.work_policy(),
        1,
    );
    info!(
        correlation_id = %correlation_id,
        monthly_base_rate = %request.monthly_base_rate,
        schedule_effective_date = %schedule.effective_date,
        weekly_total = %deductions.weekly.gross_total(),
        "Deductions calculated"
    );

    json_response(
        StatusCode::OK,
        DeductionsResponse {
            effective_date: request.effective_date,
            schedule_effective_date: schedule.effective_date,
            monthly: deductions.monthly,
            weekly: deductions.weekly,
            audit_steps: deductions.audit_steps,
        },
    )
}
