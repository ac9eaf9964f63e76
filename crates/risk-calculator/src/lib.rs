//! Security priority calculator: weighted scoring of third-party application requests.

pub mod calculator;
pub mod config;
pub mod error;
pub mod telemetry;
