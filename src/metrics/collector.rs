// src/metrics/collector.rs
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Text exposition format, as served on `/metrics`.
    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Request metrics
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,

    // Busy loop
    pub busy_loop_seconds: Histogram,

    // Dependencies
    pub dependency_up: IntGaugeVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("demo_requests_total", "Total number of requests"),
            &["path", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "demo_request_duration_seconds",
                "Request duration in seconds",
            ),
            &["path"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let busy_loop_seconds = Histogram::with_opts(HistogramOpts::new(
            "demo_busy_loop_seconds",
            "Time spent in the /app/busy loop",
        ))?;
        registry.register(Box::new(busy_loop_seconds.clone()))?;

        let dependency_up = IntGaugeVec::new(
            Opts::new(
                "demo_dependency_up",
                "Dependency health (1=reachable, 0=unreachable, -1=disabled)",
            ),
            &["dependency"],
        )?;
        registry.register(Box::new(dependency_up.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            busy_loop_seconds,
            dependency_up,
        })
    }

    pub fn record_request(&self, path: &str, status_code: u16, duration: Duration) {
        let status = status_code.to_string();
        self.requests_total
            .with_label_values(&[path, &status])
            .inc();

        self.request_duration_seconds
            .with_label_values(&[path])
            .observe(duration.as_secs_f64());
    }

    pub fn record_busy_loop(&self, duration: Duration) {
        self.busy_loop_seconds.observe(duration.as_secs_f64());
    }

    pub fn update_dependency_health(&self, dependency: &str, value: i64) {
        self.dependency_up
            .with_label_values(&[dependency])
            .set(value);
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
