// src/health/checker.rs
use crate::connections::{AppContext, StoreError};
use crate::health::{Dependency, HealthStatus};
use crate::metrics::MetricsCollector;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Narrow liveness interface. Implementations issue exactly one request and
/// return its reply as text.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> Result<String, StoreError>;
}

/// Classify one dependency. An absent handle means the dependency was never
/// enabled, so no request is made.
pub async fn check<P>(handle: Option<&P>) -> HealthStatus
where
    P: Probe + ?Sized,
{
    let Some(handle) = handle else {
        return HealthStatus::Disabled;
    };

    match handle.probe().await {
        Ok(detail) => HealthStatus::Reachable(detail),
        Err(e) => HealthStatus::Unreachable(e.to_string()),
    }
}

#[derive(Debug)]
pub struct HealthCheckResult {
    pub dependency: Dependency,
    pub status: HealthStatus,
}

/// Runs the per-dependency checks against an `AppContext`, one request each,
/// no retries.
pub struct HealthChecker {
    context: AppContext,
    metrics: Option<Arc<MetricsCollector>>,
}

impl HealthChecker {
    pub fn new(context: AppContext, metrics: Option<Arc<MetricsCollector>>) -> Self {
        Self { context, metrics }
    }

    pub async fn cache(&self) -> HealthStatus {
        let status = check(self.context.cache()).await;
        self.record(Dependency::Cache, &status);
        status
    }

    pub async fn search(&self) -> HealthStatus {
        let status = check(self.context.search()).await;
        self.record(Dependency::Search, &status);
        status
    }

    /// Check every dependency in order. A failure in one never skips the next.
    pub async fn check_all(&self) -> Vec<HealthCheckResult> {
        let results = vec![
            HealthCheckResult {
                dependency: Dependency::Cache,
                status: self.cache().await,
            },
            HealthCheckResult {
                dependency: Dependency::Search,
                status: self.search().await,
            },
        ];

        let reachable = results.iter().filter(|r| r.status.is_reachable()).count();
        info!(
            "Dependency check complete: {} of {} reachable",
            reachable,
            results.len()
        );

        results
    }

    fn record(&self, dependency: Dependency, status: &HealthStatus) {
        match status {
            HealthStatus::Reachable(detail) => debug!("{} is reachable: {}", dependency, detail),
            HealthStatus::Unreachable(error) => warn!("{} is unreachable: {}", dependency, error),
            HealthStatus::Disabled => debug!("{} is disabled", dependency),
        }

        if let Some(metrics) = &self.metrics {
            metrics.update_dependency_health(dependency.name(), status.gauge_value());
        }
    }
}
