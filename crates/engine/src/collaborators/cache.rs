//! TTL cache in front of a catalog provider

use super::CatalogProvider;
use async_trait::async_trait;
use goodwatch_core::{CatalogItem, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct CachedSnapshot {
    items: Arc<Vec<CatalogItem>>,
    cached_at: Instant,
}

/// Serves a cached snapshot until it expires
///
/// When a refresh fails and a previous snapshot exists, the stale snapshot is
/// served instead of the error.
pub struct CachedCatalogProvider<P> {
    inner: P,
    cache: Arc<RwLock<Option<CachedSnapshot>>>,
    cache_ttl: Duration,
}

impl<P: CatalogProvider> CachedCatalogProvider<P> {
    pub fn new(inner: P, cache_ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    /// Drop the cached snapshot so the next call refreshes
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn refresh(&self) -> Result<Arc<Vec<CatalogItem>>> {
        match self.inner.snapshot().await {
            Ok(items) => {
                let items = Arc::new(items);
                let mut cache = self.cache.write().await;
                *cache = Some(CachedSnapshot {
                    items: Arc::clone(&items),
                    cached_at: Instant::now(),
                });
                debug!(items = items.len(), "Refreshed catalog snapshot");
                Ok(items)
            }
            Err(err) => {
                let cache = self.cache.read().await;
                match cache.as_ref() {
                    Some(stale) => {
                        warn!(
                            error = %err,
                            age_secs = stale.cached_at.elapsed().as_secs(),
                            "Catalog refresh failed; serving stale snapshot"
                        );
                        Ok(Arc::clone(&stale.items))
                    }
                    None => Err(err),
                }
            }
        }
    }
}

#[async_trait]
impl<P: CatalogProvider> CatalogProvider for CachedCatalogProvider<P> {
    async fn snapshot(&self) -> Result<Vec<CatalogItem>> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.cached_at.elapsed() < self.cache_ttl {
                    return Ok(cached.items.as_ref().clone());
                }
            }
        }

        let items = self.refresh().await?;
        Ok(items.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::movie;
    use goodwatch_core::GoodWatchError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Succeeds on the first call only
    struct FlakyCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogProvider for FlakyCatalog {
        async fn snapshot(&self) -> Result<Vec<CatalogItem>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![movie("m1")])
            } else {
                Err(GoodWatchError::collaborator("catalog", "unreachable"))
            }
        }
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl() {
        let provider = CachedCatalogProvider::new(
            FlakyCatalog {
                calls: AtomicUsize::new(0),
            },
            Duration::from_secs(60),
        );
        assert_eq!(provider.snapshot().await.unwrap().len(), 1);
        assert_eq!(provider.snapshot().await.unwrap().len(), 1);
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_on_failure() {
        let provider = CachedCatalogProvider::new(
            FlakyCatalog {
                calls: AtomicUsize::new(0),
            },
            Duration::ZERO,
        );
        assert_eq!(provider.snapshot().await.unwrap().len(), 1);
        let stale = provider.snapshot().await.unwrap();
        assert_eq!(stale[0].id, "m1");
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_without_snapshot() {
        let provider = CachedCatalogProvider::new(
            FlakyCatalog {
                calls: AtomicUsize::new(1),
            },
            Duration::from_secs(60),
        );
        assert!(provider.snapshot().await.is_err());
    }
}
