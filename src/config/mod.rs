//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from YAML
//! files, including schedule metadata, the work policy and the versioned
//! statutory deduction schedules.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ph_2023").unwrap();
//! println!("Loaded schedule: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    HealthInsuranceSchedule, HousingFundSchedule, PayrollConfig, ScheduleMetadata,
    StatutorySchedule, WorkPolicy,
};
