use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::config::CacheConfig;
use crate::models::{JobListing, SearchQuery};

struct CacheEntry {
    jobs: Vec<JobListing>,
    fetched_at: DateTime<Utc>,
}

/// In-memory cache for upstream search responses, keyed by the normalized
/// query. Bounded: once the map exceeds `max_entries` the oldest
/// `evict_batch` entries are dropped in one pass.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    evict_batch: usize,
}

impl ResponseCache {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(config.ttl_seconds),
            max_entries: config.max_entries,
            evict_batch: config.evict_batch,
        }
    }

    pub fn get(&self, query: &SearchQuery) -> Option<Vec<JobListing>> {
        self.get_at(query, Utc::now())
    }

    pub fn put(&self, query: &SearchQuery, jobs: Vec<JobListing>) {
        self.put_at(query, jobs, Utc::now());
    }

    /// Lookup with an explicit clock. Expired entries are removed on read.
    pub fn get_at(&self, query: &SearchQuery, now: DateTime<Utc>) -> Option<Vec<JobListing>> {
        let key = query.cache_key();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get(&key) {
            Some(entry) if now - entry.fetched_at < self.ttl => {
                debug!("Cache hit for {key}");
                Some(entry.jobs.clone())
            }
            Some(_) => {
                debug!("Cache entry expired for {key}");
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put_at(&self, query: &SearchQuery, jobs: Vec<JobListing>, now: DateTime<Utc>) {
        let key = query.cache_key();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        entries.insert(
            key,
            CacheEntry {
                jobs,
                fetched_at: now,
            },
        );

        if entries.len() > self.max_entries {
            let mut by_age: Vec<(String, DateTime<Utc>)> = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.fetched_at))
                .collect();
            by_age.sort_by_key(|(_, fetched_at)| *fetched_at);

            for (key, _) in by_age.into_iter().take(self.evict_batch) {
                entries.remove(&key);
            }
            debug!("Evicted {} oldest cache entries", self.evict_batch);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
