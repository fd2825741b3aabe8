// src/config.rs

use std::env;

/// Runtime settings for the cache subsystem, read from the environment.
///
/// `.env` loading can be suppressed with `NO_DOTENV=true` so tests control
/// their environment exactly.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub key_prefix: String,
    pub enabled: bool,
    pub admin_host: String,
    pub admin_port: u16,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        if env::var("NO_DOTENV").is_err() {
            dotenvy::dotenv().ok();
        }

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let key_prefix = env::var("CACHE_KEY_PREFIX").unwrap_or_else(|_| "tably".to_string());
        let enabled = env::var("CACHE_ENABLED")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(true);
        let admin_host = env::var("ADMIN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let admin_port = env::var("ADMIN_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8091);

        Self {
            redis_url,
            key_prefix,
            enabled,
            admin_host,
            admin_port,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "tably".to_string(),
            enabled: true,
            admin_host: "127.0.0.1".to_string(),
            admin_port: 8091,
        }
    }
}
