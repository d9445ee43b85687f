// src/health/mod.rs
mod checker;
mod status;

pub use checker::{check, HealthCheckResult, HealthChecker, Probe};
pub use status::{Dependency, HealthStatus};
