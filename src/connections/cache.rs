// src/connections/cache.rs
use crate::config::ServiceEndpoint;
use crate::connections::StoreError;
use crate::health::Probe;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Cmd, FromRedisValue};
use tracing::debug;

/// Key-value operations the HTTP surface needs from the cache store.
#[async_trait]
pub trait CacheStore: Probe {
    /// Raw bytes stored under `key`, or `None` if the key is missing.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

enum Connection {
    /// Long-lived connection shared by every request.
    Managed(ConnectionManager),
    /// Connects on each call; construction never touches the network.
    OnDemand(Client),
}

pub struct RedisCache {
    connection: Connection,
}

impl RedisCache {
    /// Open the connection now. Fails if the server is unreachable.
    pub async fn connect(endpoint: &ServiceEndpoint) -> Result<Self, StoreError> {
        let client = Client::open(endpoint.redis_url().as_str())?;
        let manager = ConnectionManager::new(client).await?;
        debug!("Connected to redis at {}:{}", endpoint.host, endpoint.port);

        Ok(Self {
            connection: Connection::Managed(manager),
        })
    }

    /// Validate the address but defer connecting until the first command.
    pub fn lazy(endpoint: &ServiceEndpoint) -> Result<Self, StoreError> {
        let client = Client::open(endpoint.redis_url().as_str())?;

        Ok(Self {
            connection: Connection::OnDemand(client),
        })
    }

    async fn run<T>(&self, cmd: Cmd) -> Result<T, StoreError>
    where
        T: FromRedisValue + Send,
    {
        let value: T = match &self.connection {
            Connection::Managed(manager) => {
                let mut conn = manager.clone();
                cmd.query_async(&mut conn).await?
            }
            Connection::OnDemand(client) => {
                let mut conn = client.get_multiplexed_tokio_connection().await?;
                cmd.query_async(&mut conn).await?
            }
        };
        Ok(value)
    }
}

#[async_trait]
impl Probe for RedisCache {
    async fn probe(&self) -> Result<String, StoreError> {
        let reply = self.run::<String>(redis::cmd("PING")).await?;
        ping_ack(&reply)
    }
}

/// A server that answers `PONG` is acknowledged as `True`; any other reply
/// is treated as a failed ping.
fn ping_ack(reply: &str) -> Result<String, StoreError> {
    if reply == "PONG" {
        Ok("True".to_string())
    } else {
        Err(StoreError::UnexpectedResponse(format!("PING returned {:?}", reply)))
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.run::<Option<Vec<u8>>>(cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_endpoint() -> ServiceEndpoint {
        // Port 1 is reserved (tcpmux) and closed on any sane test host.
        ServiceEndpoint {
            host: "127.0.0.1".to_string(),
            port: 1,
        }
    }

    #[test]
    fn lazy_handle_does_not_connect() {
        assert!(RedisCache::lazy(&unreachable_endpoint()).is_ok());
    }

    #[test]
    fn pong_is_acknowledged_as_true() {
        assert_eq!(ping_ack("PONG").unwrap(), "True");
        assert!(matches!(
            ping_ack("LOADING"),
            Err(StoreError::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn lazy_probe_to_closed_port_is_a_redis_error() {
        let cache = RedisCache::lazy(&unreachable_endpoint()).unwrap();
        let err = cache.probe().await.unwrap_err();
        assert!(matches!(err, StoreError::Redis(_)));
    }
}
