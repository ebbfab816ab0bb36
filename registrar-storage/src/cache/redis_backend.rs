//! Redis cache backend.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use registrar_core::CacheError;

use super::traits::CacheBackend;

/// Redis-backed cache using a multiplexed, auto-reconnecting connection.
///
/// Every command is bounded by `timeout`, so a slow or partitioned Redis
/// costs a request at most one timeout per cache call before the caller
/// falls back to the record store.
#[derive(Clone)]
pub struct RedisCacheBackend {
    conn: ConnectionManager,
    timeout: Duration,
}

impl std::fmt::Debug for RedisCacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheBackend")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCacheBackend {
    /// Open a connection to `url` and verify it with a PING.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Unavailable {
            reason: format!("invalid redis url: {}", e),
        })?;

        let conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout {
                operation: "connect",
                timeout,
            })?
            .map_err(|e| CacheError::Unavailable {
                reason: e.to_string(),
            })?;

        let backend = Self { conn, timeout };
        backend.ping().await?;
        Ok(backend)
    }

    /// Configured per-command timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::Transport {
                operation,
                reason: e.to_string(),
            }),
            Err(_) => Err(CacheError::Timeout {
                operation,
                timeout: self.timeout,
            }),
        }
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        self.bounded("get", async move {
            let value: Option<Vec<u8>> = conn.get(key).await?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        self.bounded("set", async move {
            let _: () = conn.set_ex(key, value, seconds).await?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        self.bounded("delete", async move {
            let _: () = conn.del(key).await?;
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        self.bounded("ping", async move {
            let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let result = RedisCacheBackend::connect("not a redis url", Duration::from_millis(50)).await;
        assert!(matches!(result, Err(CacheError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails_fast() {
        // Port 1 is reserved and nothing listens there in CI.
        let started = std::time::Instant::now();
        let result =
            RedisCacheBackend::connect("redis://127.0.0.1:1", Duration::from_millis(200)).await;
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
