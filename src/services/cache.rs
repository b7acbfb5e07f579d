use std::sync::Arc;
use std::time::Duration;

use crate::models::JobPosting;

/// In-process cache for job-source search results
///
/// Keeps repeated searches for the same query from hitting the upstream
/// API until the TTL expires.
#[derive(Clone)]
pub struct SearchCache {
    cache: moka::future::Cache<String, Arc<Vec<JobPosting>>>,
    ttl_secs: u64,
}

impl SearchCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache, ttl_secs }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<JobPosting>>> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Search cache hit: {}", key);
        } else {
            tracing::trace!("Search cache miss: {}", key);
        }
        hit
    }

    pub async fn insert(&self, key: &str, jobs: Arc<Vec<JobPosting>>) {
        self.cache.insert(key.to_string(), jobs).await;
        tracing::trace!("Search cache set: {}", key);
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for an Adzuna search
    pub fn adzuna_search(what: &str, where_: &str, results_per_page: u32, page: u32) -> String {
        format!(
            "adzuna:{}:{}:{}:{}",
            what.trim().to_lowercase(),
            where_.trim().to_lowercase(),
            results_per_page,
            page
        )
    }
}
