//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for running payroll over
//! employee master data and time records, and for quoting the statutory
//! deductions of a single salary.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    DeductionsRequest, EmployeeRequest, PayrollRequest, PunchRequest, WeeklyRecordRequest,
};
pub use response::{ApiError, DeductionsResponse};
pub use state::AppState;
