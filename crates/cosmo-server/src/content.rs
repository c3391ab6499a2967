//! CMS content with a per-page revalidation window.
//!
//! Successful responses are kept for a configured number of seconds and
//! served from memory until they expire; the next request after expiry
//! fetches again. Failures are never stored, so a CMS outage is retried on
//! the following request rather than pinned for the whole window.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use cosmo_cms::{CmsClient, CmsError, RawService, RawWork};
use cosmo_core::AppConfig;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// Entries kept per cache before the oldest is dropped.
const DEFAULT_CAPACITY: usize = 256;

/// A keyed store whose entries are valid for `ttl` after they were fetched.
///
/// Expired entries are purged on every insert and the map never holds more
/// than `capacity` entries; when full, the oldest entry makes room.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The stored value for `key` if it is still fresh.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: &str, value: V) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);

        if entries.len() >= self.capacity && !entries.contains_key(key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(key = %oldest, "content cache full, evicting oldest entry");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns the stored value for `key` while it is fresh, otherwise runs
    /// `fetch` and stores its result if it succeeded.
    ///
    /// # Errors
    ///
    /// Propagates the error from `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V, CmsError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CmsError>>,
    {
        if let Some(value) = self.get(key).await {
            tracing::debug!(key, "content cache hit");
            return Ok(value);
        }

        tracing::debug!(key, "content cache miss");
        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }
}

/// Revalidation windows per page family.
#[derive(Debug, Clone, Copy)]
pub struct Revalidation {
    pub services: Duration,
    pub detail: Duration,
    pub works: Duration,
}

impl Revalidation {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            services: Duration::from_secs(config.revalidate_services_secs),
            detail: Duration::from_secs(config.revalidate_detail_secs),
            works: Duration::from_secs(config.revalidate_works_secs),
        }
    }
}

const ALL: &str = "all";

/// Raw CMS records behind the page endpoints.
#[derive(Debug)]
pub struct ContentService {
    cms: CmsClient,
    services: TtlCache<Arc<Vec<RawService>>>,
    slugs: TtlCache<Arc<Vec<String>>>,
    details: TtlCache<Arc<RawService>>,
    works: TtlCache<Arc<Vec<RawWork>>>,
}

impl ContentService {
    #[must_use]
    pub fn new(cms: CmsClient, revalidation: Revalidation) -> Self {
        Self {
            cms,
            services: TtlCache::new(revalidation.services),
            slugs: TtlCache::new(revalidation.services),
            details: TtlCache::new(revalidation.detail),
            works: TtlCache::new(revalidation.works),
        }
    }

    /// # Errors
    ///
    /// Returns the [`CmsError`] of the fetch when nothing fresh is stored.
    pub async fn services(&self) -> Result<Arc<Vec<RawService>>, CmsError> {
        self.services
            .get_or_fetch(ALL, || async { self.cms.list_services().await.map(Arc::new) })
            .await
    }

    /// Only services that exist are kept; an unknown slug is asked of the
    /// CMS every time so client-chosen slugs cannot fill the cache.
    ///
    /// # Errors
    ///
    /// Returns the [`CmsError`] of the fetch when nothing fresh is stored.
    pub async fn service(&self, slug: &str) -> Result<Option<Arc<RawService>>, CmsError> {
        if let Some(service) = self.details.get(slug).await {
            tracing::debug!(key = slug, "content cache hit");
            return Ok(Some(service));
        }

        let found = self.cms.service_by_slug(slug).await?.map(Arc::new);
        if let Some(service) = &found {
            self.details.insert(slug, Arc::clone(service)).await;
        }
        Ok(found)
    }

    /// # Errors
    ///
    /// Returns the [`CmsError`] of the fetch when nothing fresh is stored.
    pub async fn service_slugs(&self) -> Result<Arc<Vec<String>>, CmsError> {
        self.slugs
            .get_or_fetch(ALL, || async {
                self.cms.list_service_slugs().await.map(Arc::new)
            })
            .await
    }

    /// # Errors
    ///
    /// Returns the [`CmsError`] of the fetch when nothing fresh is stored.
    pub async fn works(&self) -> Result<Arc<Vec<RawWork>>, CmsError> {
        self.works
            .get_or_fetch(ALL, || async { self.cms.list_works().await.map(Arc::new) })
            .await
    }
}
