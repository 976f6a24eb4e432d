//! Payslip-based credit scoring: rule engine, HTTP routes, payroll import, and service plumbing.

pub mod config;
pub mod error;
pub mod payroll;
pub mod scoring;
pub mod telemetry;
