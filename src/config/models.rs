// src/config/models.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:7892";
const DEFAULT_PING_TIMEOUT_SECS: u64 = 5;
const DEFAULT_ELASTICSEARCH_PORT: u16 = 9200;

/// Raw view of the environment. Every value arrives as a string; `Settings`
/// does the validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    project_name: String,
    #[serde(default)]
    namespace: Option<String>,
    redis_create: String,
    elasticsearch_create: String,
    #[serde(default)]
    elasticsearch_host: Option<String>,
    #[serde(default)]
    aladdin_demo_server_service_host: Option<String>,
    #[serde(default)]
    aladdin_demo_server_service_port: Option<u16>,
    #[serde(default)]
    listen_addr: Option<String>,
    #[serde(default)]
    status_ping_timeout_secs: Option<u64>,
}

/// host:port pair published by Kubernetes service discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServiceEndpoint {
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }

    pub fn http_url(&self, path: &str) -> Result<Url> {
        let raw = format!("http://{}:{}{}", self.host, self.port, path);
        Url::parse(&raw).with_context(|| format!("Invalid service address: {}", raw))
    }
}

/// Resolved process configuration.
///
/// A dependency is enabled exactly when its endpoint is `Some`; the creation
/// flags are folded into that presence and not kept separately.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub namespace: Option<String>,
    pub listen_addr: SocketAddr,
    pub status_ping_timeout: Duration,
    pub redis: Option<ServiceEndpoint>,
    pub elasticsearch: Option<Url>,
    pub server: Option<ServiceEndpoint>,
}

impl Settings {
    /// Build settings from an already-collected `config::Config`.
    ///
    /// Keys are looked up lowercased, which is how `config::Environment`
    /// stores them.
    pub fn from_config(source: &::config::Config) -> Result<Self> {
        let raw: RawSettings = source
            .clone()
            .try_deserialize()
            .context("Invalid environment configuration")?;

        let redis = if parse_flag("REDIS_CREATE", &raw.redis_create)? {
            let prefix = env_prefix(&raw.project_name);
            let host = lookup(source, &format!("{}_REDIS_SERVICE_HOST", prefix))?;
            let port = lookup(source, &format!("{}_REDIS_SERVICE_PORT", prefix))?;
            let port = port
                .parse::<u16>()
                .with_context(|| format!("Invalid {}_REDIS_SERVICE_PORT: {}", prefix, port))?;
            Some(ServiceEndpoint { host, port })
        } else {
            None
        };

        let elasticsearch = if parse_flag("ELASTICSEARCH_CREATE", &raw.elasticsearch_create)? {
            let host = raw
                .elasticsearch_host
                .as_deref()
                .context("ELASTICSEARCH_HOST must be set when ELASTICSEARCH_CREATE is true")?;
            Some(search_url(host)?)
        } else {
            None
        };

        let server = match (
            raw.aladdin_demo_server_service_host,
            raw.aladdin_demo_server_service_port,
        ) {
            (Some(host), Some(port)) => Some(ServiceEndpoint { host, port }),
            _ => None,
        };

        let listen_addr = raw
            .listen_addr
            .as_deref()
            .unwrap_or(DEFAULT_LISTEN_ADDR)
            .parse()
            .context("Invalid LISTEN_ADDR")?;

        Ok(Self {
            project_name: raw.project_name,
            namespace: raw.namespace,
            listen_addr,
            status_ping_timeout: Duration::from_secs(
                raw.status_ping_timeout_secs
                    .unwrap_or(DEFAULT_PING_TIMEOUT_SECS),
            ),
            redis,
            elasticsearch,
            server,
        })
    }

    /// URL of this service's own `/ping` endpoint, as seen through service
    /// discovery.
    pub fn self_ping_url(&self) -> Result<Url> {
        match &self.server {
            Some(endpoint) => endpoint.http_url("/ping"),
            None => bail!(
                "ALADDIN_DEMO_SERVER_SERVICE_HOST and ALADDIN_DEMO_SERVER_SERVICE_PORT must be set"
            ),
        }
    }

    pub fn namespace(&self) -> Result<&str> {
        self.namespace
            .as_deref()
            .context("NAMESPACE must be set")
    }
}

/// Service-discovery prefix for a project: `my-app` becomes `MY_APP`.
pub fn env_prefix(project_name: &str) -> String {
    project_name.to_uppercase().replace('-', "_")
}

/// Normalize `ELASTICSEARCH_HOST` into a base URL. Bare hosts get the `http`
/// scheme, and a missing port defaults to 9200.
pub fn search_url(host: &str) -> Result<Url> {
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let mut url = Url::parse(&raw).with_context(|| format!("Invalid ELASTICSEARCH_HOST: {}", host))?;
    if url.port().is_none() {
        url.set_port(Some(DEFAULT_ELASTICSEARCH_PORT))
            .map_err(|_| anyhow::anyhow!("Invalid ELASTICSEARCH_HOST: {}", host))?;
    }
    // Relative joins replace the last segment unless the path ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("{} must be \"true\" or \"false\", got {:?}", name, other),
    }
}

fn lookup(source: &::config::Config, name: &str) -> Result<String> {
    source
        .get_string(&name.to_lowercase())
        .with_context(|| format!("{} must be set", name))
}
