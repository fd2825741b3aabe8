// src/cache/store.rs

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::CacheResult;

/// Contract over the remote key-value backing store.
///
/// `delete_by_prefix` is best-effort: implementations that cannot enumerate
/// keys log a warning and report zero deletions instead of failing, because a
/// missed invalidation must never fail the write it is attached to.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;
    async fn delete(&self, key: &str) -> CacheResult<()>;
    /// Delete every key starting with `prefix`, returning the number removed.
    async fn delete_by_prefix(&self, prefix: &str) -> CacheResult<u64>;
}

/// In-process store with TTL support, used by tests and as a fallback when no
/// Redis is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), (value.to_vec(), Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> CacheResult<u64> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("k1", b"hello", Duration::from_secs(60))
            .await
            .unwrap();

        let value = store.get("k1").await.unwrap();
        assert_eq!(value, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store
            .put("k1", b"v", Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("k1").await.unwrap();
        assert_eq!(store.get("k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let store = MemoryStore::new();
        store.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let store = MemoryStore::new();
        store
            .put("k1", b"v", Duration::from_millis(30))
            .await
            .unwrap();

        assert!(store.get("k1").await.unwrap().is_some());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.get("k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_by_prefix() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.put("a:1:x", b"v", ttl).await.unwrap();
        store.put("a:1:y", b"v", ttl).await.unwrap();
        store.put("a:2:x", b"v", ttl).await.unwrap();

        let removed = store.delete_by_prefix("a:1:").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.get("a:1:x").await.unwrap(), None);
        assert!(store.get("a:2:x").await.unwrap().is_some());
    }
}
