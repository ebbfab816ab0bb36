//! Disabled cache backend.

use std::time::Duration;

use async_trait::async_trait;
use registrar_core::CacheError;

use super::traits::CacheBackend;

/// Backend used when caching is turned off or Redis could not be reached at
/// startup. Reads always miss and writes are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCacheBackend;

#[async_trait]
impl CacheBackend for NullCacheBackend {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable {
            reason: "cache is disabled".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_backend_never_stores() -> Result<(), CacheError> {
        let backend = NullCacheBackend;
        backend
            .set("k", b"v".to_vec(), Duration::from_secs(60))
            .await?;
        assert_eq!(backend.get("k").await?, None);
        backend.delete("k").await?;
        assert!(!backend.is_enabled());
        Ok(())
    }

    #[tokio::test]
    async fn test_null_backend_ping_reports_unavailable() {
        let result = NullCacheBackend.ping().await;
        assert!(matches!(result, Err(CacheError::Unavailable { .. })));
    }
}
