// src/connections/context.rs
use crate::config::Settings;
use crate::connections::{CacheStore, ElasticsearchClient, RedisCache, SearchStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Dependency handles, built once at startup and shared read-only.
///
/// A handle is present exactly when its creation flag was true.
#[derive(Clone, Default)]
pub struct AppContext {
    cache: Option<Arc<dyn CacheStore>>,
    search: Option<Arc<dyn SearchStore>>,
}

impl AppContext {
    pub fn new(cache: Option<Arc<dyn CacheStore>>, search: Option<Arc<dyn SearchStore>>) -> Self {
        Self { cache, search }
    }

    /// Build handles for the server. The cache connection is opened eagerly,
    /// so an enabled but unreachable Redis fails startup.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let cache: Option<Arc<dyn CacheStore>> = match &settings.redis {
            Some(endpoint) => {
                let cache = RedisCache::connect(endpoint)
                    .await
                    .with_context(|| format!("Failed to connect to redis at {}:{}", endpoint.host, endpoint.port))?;
                info!("Redis handle created for {}:{}", endpoint.host, endpoint.port);
                let cache: Arc<dyn CacheStore> = Arc::new(cache);
                Some(cache)
            }
            None => None,
        };

        Ok(Self {
            cache,
            search: Self::search_handle(settings)?,
        })
    }

    /// Build handles for CLI commands. Nothing touches the network until a
    /// command is issued, so a dead dependency shows up as a failed probe.
    pub fn open(settings: &Settings) -> Result<Self> {
        let cache: Option<Arc<dyn CacheStore>> = match &settings.redis {
            Some(endpoint) => {
                let cache: Arc<dyn CacheStore> =
                    Arc::new(RedisCache::lazy(endpoint).context("Invalid redis address")?);
                Some(cache)
            }
            None => None,
        };

        Ok(Self {
            cache,
            search: Self::search_handle(settings)?,
        })
    }

    fn search_handle(settings: &Settings) -> Result<Option<Arc<dyn SearchStore>>> {
        match &settings.elasticsearch {
            Some(base) => {
                let client = ElasticsearchClient::new(base.clone())
                    .context("Failed to build elasticsearch client")?;
                info!("Elasticsearch handle created for {}", base);
                let search: Arc<dyn SearchStore> = Arc::new(client);
                Ok(Some(search))
            }
            None => Ok(None),
        }
    }

    pub fn cache(&self) -> Option<&dyn CacheStore> {
        self.cache.as_deref()
    }

    pub fn search(&self) -> Option<&dyn SearchStore> {
        self.search.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEndpoint;
    use std::time::Duration;

    fn settings_with_dead_redis() -> Settings {
        Settings {
            project_name: "aladdin-demo".to_string(),
            namespace: None,
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            status_ping_timeout: Duration::from_secs(1),
            // Port 1 is reserved (tcpmux) and closed on any sane test host.
            redis: Some(ServiceEndpoint {
                host: "127.0.0.1".to_string(),
                port: 1,
            }),
            elasticsearch: None,
            server: None,
        }
    }

    #[tokio::test]
    async fn server_startup_fails_when_redis_is_unreachable() {
        // The connection manager retries with backoff before giving up.
        let result = tokio::time::timeout(
            Duration::from_secs(60),
            AppContext::connect(&settings_with_dead_redis()),
        )
        .await
        .expect("eager connect never gave up");

        let err = result.err().unwrap();
        assert!(err.to_string().contains("Failed to connect to redis at 127.0.0.1:1"));
    }

    #[tokio::test]
    async fn cli_handles_open_without_a_reachable_redis() {
        let context = AppContext::open(&settings_with_dead_redis()).unwrap();

        assert!(context.cache().is_some());
        assert!(context.search().is_none());
    }

    #[test]
    fn disabled_dependencies_have_no_handles() {
        let mut settings = settings_with_dead_redis();
        settings.redis = None;

        let context = AppContext::open(&settings).unwrap();

        assert!(context.cache().is_none());
        assert!(context.search().is_none());
    }
}
