// src/commands/serve.rs
use crate::config::Settings;
use crate::connections::AppContext;
use crate::health::{HealthChecker, HealthStatus};
use crate::metrics::MetricsRegistry;
use crate::server::{App, RequestHandler, ServerBuilder};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// `serve` command: connect enabled dependencies, log their health, serve
/// HTTP until SIGTERM.
pub async fn run(settings: &Settings) -> Result<()> {
    let context = AppContext::connect(settings).await?;
    let registry = Arc::new(MetricsRegistry::new()?);

    let checker = HealthChecker::new(context.clone(), Some(registry.collector()));
    for result in checker.check_all().await {
        match &result.status {
            HealthStatus::Unreachable(error) => {
                warn!("{} failed its startup check: {}", result.dependency, error)
            }
            status => info!("{} startup check: {}", result.dependency, status),
        }
    }

    let app = App::new(context, registry);
    info!(
        "Registered routes: {}",
        app.routes().paths().collect::<Vec<_>>().join(", ")
    );

    ServerBuilder::new(settings.listen_addr)
        .with_handler(RequestHandler::new(app))
        .serve()
        .await?;

    info!("Server stopped");
    Ok(())
}
