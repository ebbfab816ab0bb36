//! API Configuration Module
//!
//! Server, CORS and cache settings loaded from environment variables with
//! defaults suited to local development.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use registrar_core::ConfigError;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// HTTP server and CORS configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind to.
    pub bind_host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Deployment environment label (development, staging, production).
    pub environment: String,

    pub cache: CacheSettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
            environment: "development".to_string(),
            cache: CacheSettings::default(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `REGISTRAR_API_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` or `REGISTRAR_API_PORT`: Listen port (default: 8080)
    /// - `REGISTRAR_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `REGISTRAR_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `REGISTRAR_ENVIRONMENT`: Deployment label (default: development)
    /// - cache variables, see [`CacheSettings::from_lookup`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("REGISTRAR_API_BIND").unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("REGISTRAR_API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let cors_origins = lookup("REGISTRAR_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = lookup("REGISTRAR_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let environment = lookup("REGISTRAR_ENVIRONMENT").unwrap_or(defaults.environment);

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs,
            environment,
            cache: CacheSettings::from_lookup(&lookup)?,
        })
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "REGISTRAR_API_BIND".to_string(),
                value: addr.clone(),
                reason: e.to_string(),
            })
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }
        self.cors_origins.iter().any(|allowed| allowed == origin)
    }
}

// ============================================================================
// CACHE CONFIGURATION
// ============================================================================

/// Which cache backend to wire at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    #[default]
    Redis,
    Memory,
    Disabled,
}

impl CacheBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackendKind::Redis => "redis",
            CacheBackendKind::Memory => "memory",
            CacheBackendKind::Disabled => "disabled",
        }
    }
}

impl fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(CacheBackendKind::Redis),
            "memory" => Ok(CacheBackendKind::Memory),
            "disabled" | "none" | "off" => Ok(CacheBackendKind::Disabled),
            _ => Err(format!("Invalid cache backend: {}", s)),
        }
    }
}

/// Cache wiring configuration. The snapshot TTL is fixed and not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub backend: CacheBackendKind,
    pub redis_url: String,
    /// Upper bound on every individual cache call.
    pub timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            timeout: Duration::from_millis(250),
        }
    }
}

impl CacheSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Environment variables:
    /// - `REGISTRAR_CACHE_BACKEND`: redis | memory | disabled (default: redis)
    /// - `REGISTRAR_REDIS_URL`: Redis connection URL (default: redis://127.0.0.1:6379)
    /// - `REGISTRAR_CACHE_TIMEOUT_MS`: Per-call timeout (default: 250)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup("REGISTRAR_CACHE_BACKEND") {
            Some(raw) => raw
                .parse::<CacheBackendKind>()
                .map_err(|reason| ConfigError::InvalidValue {
                    field: "REGISTRAR_CACHE_BACKEND".to_string(),
                    value: raw.clone(),
                    reason,
                })?,
            None => defaults.backend,
        };

        let redis_url = lookup("REGISTRAR_REDIS_URL").unwrap_or(defaults.redis_url);

        let timeout = match lookup("REGISTRAR_CACHE_TIMEOUT_MS") {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    field: "REGISTRAR_CACHE_TIMEOUT_MS".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if ms == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "REGISTRAR_CACHE_TIMEOUT_MS".to_string(),
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => defaults.timeout,
        };

        Ok(Self {
            backend,
            redis_url,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.environment, "development");
        assert_eq!(config.cache, CacheSettings::default());
        Ok(())
    }

    #[test]
    fn test_port_precedence() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("REGISTRAR_API_PORT", "9001"),
        ]))?;
        assert_eq!(config.port, 9000);

        let config = ApiConfig::from_lookup(lookup_from(&[("REGISTRAR_API_PORT", "9001")]))?;
        assert_eq!(config.port, 9001);
        Ok(())
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = ApiConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_socket_addr() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("REGISTRAR_API_BIND", "127.0.0.1"),
            ("PORT", "3030"),
        ]))?;
        assert_eq!(config.socket_addr()?.to_string(), "127.0.0.1:3030");

        let mut bad = config.clone();
        bad.bind_host = "not an address".to_string();
        assert!(bad.socket_addr().is_err());
        Ok(())
    }

    #[test]
    fn test_cors_origins_parsing() -> Result<(), ConfigError> {
        let config = ApiConfig::from_lookup(lookup_from(&[(
            "REGISTRAR_CORS_ORIGINS",
            "https://a.example, ,https://b.example",
        )]))?;
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(config.is_production());
        assert!(config.is_origin_allowed("https://a.example"));
        assert!(!config.is_origin_allowed("https://evil.example"));
        Ok(())
    }

    #[test]
    fn test_origin_allowed_dev_mode() {
        let config = ApiConfig::default();
        assert!(!config.is_production());
        assert!(config.is_origin_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_cache_settings_from_lookup() -> Result<(), ConfigError> {
        let settings = CacheSettings::from_lookup(lookup_from(&[
            ("REGISTRAR_CACHE_BACKEND", "Memory"),
            ("REGISTRAR_REDIS_URL", "redis://cache:6379"),
            ("REGISTRAR_CACHE_TIMEOUT_MS", "100"),
        ]))?;
        assert_eq!(settings.backend, CacheBackendKind::Memory);
        assert_eq!(settings.redis_url, "redis://cache:6379");
        assert_eq!(settings.timeout, Duration::from_millis(100));
        Ok(())
    }

    #[test]
    fn test_cache_settings_rejects_bad_values() {
        let result =
            CacheSettings::from_lookup(lookup_from(&[("REGISTRAR_CACHE_BACKEND", "memcached")]));
        assert!(result.is_err());

        let result =
            CacheSettings::from_lookup(lookup_from(&[("REGISTRAR_CACHE_TIMEOUT_MS", "0")]));
        assert!(result.is_err());

        let result =
            CacheSettings::from_lookup(lookup_from(&[("REGISTRAR_CACHE_TIMEOUT_MS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_backend_kind_parsing() {
        assert_eq!("redis".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Redis));
        assert_eq!("off".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Disabled));
        assert_eq!(CacheBackendKind::Disabled.to_string(), "disabled");
    }
}
