// src/health/status.rs
use std::fmt;

/// Outcome of a single dependency check. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The probe succeeded; carries the probe's reply.
    Reachable(String),
    /// The probe failed; carries the client's error text.
    Unreachable(String),
    /// The dependency's creation flag is false, so there is nothing to probe.
    Disabled,
}

impl HealthStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, HealthStatus::Reachable(_))
    }

    /// Gauge value for `demo_dependency_up` (1=up, 0=down, -1=disabled).
    pub fn gauge_value(&self) -> i64 {
        match self {
            HealthStatus::Reachable(_) => 1,
            HealthStatus::Unreachable(_) => 0,
            HealthStatus::Disabled => -1,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Reachable(detail) => write!(f, "reachable ({})", detail),
            HealthStatus::Unreachable(detail) => write!(f, "unreachable: {}", detail),
            HealthStatus::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Cache,
    Search,
}

impl Dependency {
    pub fn name(&self) -> &'static str {
        match self {
            Dependency::Cache => "redis",
            Dependency::Search => "elasticsearch",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
