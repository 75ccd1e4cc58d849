//! Weekly Payroll Engine
//!
//! This crate turns raw time punches and salary master data into weekly
//! payroll ledgers: it aggregates punches into weekly worked and overtime
//! hours, applies the national statutory deduction schedule (social
//! insurance, health insurance, housing fund, withholding tax) and derives
//! gross, taxable and net pay per employee, per week, grouped by month.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod intake;
pub mod models;
