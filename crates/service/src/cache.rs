//! Keyed read-through cache for entity lookups.
//!
//! Entries are keyed by `(EntityKind, id)` and invalidated by the write paths
//! of the owning service; there are no string key patterns to enumerate.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Provider,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub id: Uuid,
}

/// TTL-bounded cache shared by the services that memoize reads.
#[derive(Clone)]
pub struct EntityCache {
    inner: Cache<CacheKey, Arc<serde_json::Value>>,
}

impl EntityCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();
        Self { inner }
    }

    pub fn from_config(cfg: &configs::CacheConfig) -> Self {
        Self::new(Duration::from_secs(cfg.ttl_secs), cfg.max_capacity)
    }

    /// Read-through lookup. Misses run the loader; `None` results are not
    /// cached.
    pub async fn get_or_load<T, F>(
        &self,
        kind: EntityKind,
        id: Uuid,
        load: F,
    ) -> Result<Option<T>, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Option<T>, ServiceError>>,
    {
        let key = CacheKey { kind, id };
        if let Some(hit) = self.inner.get(&key).await {
            let decoded = serde_json::from_value((*hit).clone())
                .map_err(|e| ServiceError::Db(format!("cache decode: {}", e)))?;
            return Ok(Some(decoded));
        }
        match load.await? {
            Some(value) => {
                let encoded = serde_json::to_value(&value)
                    .map_err(|e| ServiceError::Db(format!("cache encode: {}", e)))?;
                self.inner.insert(key, Arc::new(encoded)).await;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn invalidate(&self, kind: EntityKind, id: Uuid) {
        self.inner.invalidate(&CacheKey { kind, id }).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    async fn load_counted(
        counter: &AtomicU32,
        value: Option<&str>,
    ) -> Result<Option<String>, ServiceError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value.map(|s| s.to_string()))
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = EntityCache::new(Duration::from_secs(60), 100);
        let loads = AtomicU32::new(0);
        let id = Uuid::new_v4();

        let first = cache
            .get_or_load(EntityKind::Category, id, load_counted(&loads, Some("electronics")))
            .await
            .unwrap();
        assert_eq!(first.as_deref(), Some("electronics"));

        let second = cache
            .get_or_load(EntityKind::Category, id, load_counted(&loads, Some("stale")))
            .await
            .unwrap();
        assert_eq!(second.as_deref(), Some("electronics"));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = EntityCache::new(Duration::from_secs(60), 100);
        let loads = AtomicU32::new(0);
        let id = Uuid::new_v4();

        cache
            .get_or_load(EntityKind::Provider, id, load_counted(&loads, Some("v1")))
            .await
            .unwrap();
        cache.invalidate(EntityKind::Provider, id).await;
        let after = cache
            .get_or_load(EntityKind::Provider, id, load_counted(&loads, Some("v2")))
            .await
            .unwrap();
        assert_eq!(after.as_deref(), Some("v2"));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn negative_results_are_not_cached() {
        let cache = EntityCache::new(Duration::from_secs(60), 100);
        let loads = AtomicU32::new(0);
        let id = Uuid::new_v4();

        let miss: Option<String> = cache
            .get_or_load(EntityKind::Category, id, load_counted(&loads, None))
            .await
            .unwrap();
        assert!(miss.is_none());

        let hit = cache
            .get_or_load(EntityKind::Category, id, load_counted(&loads, Some("late")))
            .await
            .unwrap();
        assert_eq!(hit.as_deref(), Some("late"));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keys_are_scoped_by_kind() {
        let cache = EntityCache::new(Duration::from_secs(60), 100);
        let loads = AtomicU32::new(0);
        let id = Uuid::new_v4();

        cache
            .get_or_load(EntityKind::Category, id, load_counted(&loads, Some("category")))
            .await
            .unwrap();
        let other = cache
            .get_or_load(EntityKind::Provider, id, load_counted(&loads, Some("provider")))
            .await
            .unwrap();
        assert_eq!(other.as_deref(), Some("provider"));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}
