// src/cache/gateway.rs

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::key::{cache_key, TenantId};
use crate::cache::policy::{CacheKind, CachePolicy};
use crate::cache::store::KeyValueStore;
use crate::config::CacheConfig;

/// Counters snapshot for the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayStats {
    pub hits: u64,
    pub misses: u64,
    pub store_failures: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    store_failures: AtomicU64,
}

/// Read-through cache primitive. Store and serialization failures are logged
/// and absorbed: the cache is an optimization, never a dependency a request
/// may fail on. Producer errors propagate unchanged.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
    enabled: bool,
    counters: Arc<Counters>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: key_prefix.into(),
            enabled: true,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            prefix: config.key_prefix.clone(),
            enabled: config.enabled,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn key_prefix(&self) -> &str {
        &self.prefix
    }

    /// Return the cached value for `(kind, tenant, discriminator)`, or run
    /// `producer`, cache its output, and return it.
    ///
    /// Concurrent misses on a cold key each run the producer; the last put
    /// wins. All producers for a key are referentially consistent, so this is
    /// an accepted tradeoff rather than coalescing misses behind a lock.
    pub async fn remember<T, E, F, Fut>(
        &self,
        kind: CacheKind,
        tenant: TenantId,
        discriminator: Option<&str>,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return producer().await;
        }

        let key = cache_key(&self.prefix, kind, tenant, discriminator);
        // TTL is fixed before the producer runs, not re-resolved after.
        let ttl = CachePolicy::ttl(kind);

        match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_slice::<T>(&raw) {
                Ok(value) => {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(kind = %kind, tenant = %tenant, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(kind = %kind, tenant = %tenant, error = %e, "cached payload unreadable, recomputing");
                }
            },
            Ok(None) => {}
            Err(e) => {
                self.counters.store_failures.fetch_add(1, Ordering::Relaxed);
                warn!(kind = %kind, tenant = %tenant, error = %e, "cache read failed, falling back to producer");
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let value = producer().await?;

        match serde_json::to_vec(&value) {
            Ok(raw) => {
                if let Err(e) = self.store.put(&key, &raw, ttl).await {
                    self.counters.store_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(kind = %kind, tenant = %tenant, error = %e, "cache write failed, serving uncached");
                }
            }
            Err(e) => {
                warn!(kind = %kind, tenant = %tenant, error = %e, "value not serializable, serving uncached");
            }
        }

        Ok(value)
    }

    pub fn stats(&self) -> GatewayStats {
        let hits = self.counters.hits.load(Ordering::Relaxed);
        let misses = self.counters.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        GatewayStats {
            hits,
            misses,
            store_failures: self.counters.store_failures.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}
