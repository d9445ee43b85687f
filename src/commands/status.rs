// src/commands/status.rs
use crate::config::Settings;
use crate::connections::AppContext;
use crate::health::{HealthChecker, HealthStatus};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::io::{self, Write};
use std::time::Duration;
use url::Url;

/// Prints the self-ping, cache and search sections in that order. Each
/// section handles its own failure, so one dead dependency never hides the
/// others.
pub struct StatusReporter {
    client: Client,
    ping_target: Result<Url>,
    checker: HealthChecker,
}

impl StatusReporter {
    /// `ping_target` is `Err` when the server's discovery variables are
    /// missing; the self-ping section reports it instead of pinging.
    pub fn new(ping_target: Result<Url>, checker: HealthChecker, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            ping_target,
            checker,
        })
    }

    pub async fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.report_server(out).await?;
        self.report_redis(out).await?;
        self.report_elasticsearch(out).await?;
        Ok(())
    }

    pub async fn report_server<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "pinging aladdin-demo-server ...")?;

        let url = match &self.ping_target {
            Ok(url) => url.clone(),
            Err(e) => return writeln!(out, "aladdin demo endpoint connection error: {}", e),
        };

        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                writeln!(out, "aladdin demo server endpoint ping successful")
            }
            Ok(response) => writeln!(
                out,
                "aladdin demo server endpoint ping returned with status code {}",
                response.status().as_u16()
            ),
            Err(e) => writeln!(out, "aladdin demo endpoint connection error: {}", e),
        }
    }

    pub async fn report_redis<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "pinging redis ...")?;

        match self.checker.cache().await {
            HealthStatus::Disabled => writeln!(
                out,
                "redis creation flag set to false, no other redis connection available at this time"
            ),
            HealthStatus::Reachable(reply) => {
                writeln!(out, "redis connection ping successful {}", reply)
            }
            HealthStatus::Unreachable(error) => writeln!(out, "redis connection error: {}", error),
        }
    }

    pub async fn report_elasticsearch<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "getting elasticsearch health ...")?;

        match self.checker.search().await {
            HealthStatus::Disabled => writeln!(
                out,
                "elasticsearch creation flag set to false, no other elasticsearch connection available at this time"
            ),
            HealthStatus::Reachable(health) => {
                writeln!(out, "elasticsearch health retrieved: {}", health)
            }
            HealthStatus::Unreachable(error) => {
                writeln!(out, "encountered elasticsearch error: {}", error)
            }
        }
    }
}

/// `status` command: report to stdout.
pub async fn run(settings: &Settings) -> Result<()> {
    let context = AppContext::open(settings)?;
    let reporter = StatusReporter::new(
        settings.self_ping_url(),
        HealthChecker::new(context, None),
        settings.status_ping_timeout,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    reporter.report(&mut out).await?;
    Ok(())
}
