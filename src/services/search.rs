use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::JobSearchProvider;
use crate::constants::limits::RESULTS_PER_SEARCH;
use crate::db::Store;
use crate::models::{RankedJob, SearchPreferences, SearchQuery};

use super::quota::{month_key, next_reset_date, QuotaService};
use super::ranking::{dedupe_by_job_id, rank, truncate_description};
use super::ResponseCache;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Monthly search limit reached")]
    QuotaExceeded {
        reset_date: String,
        used: i32,
        max: i32,
    },

    #[error("Job search failed: {0}")]
    External(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct SearchMeta {
    pub total: usize,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from_user_collection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_searches: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_used: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_searches: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub jobs: Vec<RankedJob>,
    pub meta: SearchMeta,
}

/// Drives one user search end to end: personal collection first, then the
/// quota gate, then the cached external fetch, ranking, and bookkeeping.
#[derive(Clone)]
pub struct SearchService {
    store: Store,
    provider: Arc<dyn JobSearchProvider>,
    cache: Arc<ResponseCache>,
    quota: QuotaService,
    page_size: u32,
}

impl SearchService {
    #[must_use]
    pub fn new(
        store: Store,
        provider: Arc<dyn JobSearchProvider>,
        cache: Arc<ResponseCache>,
        quota: QuotaService,
        page_size: u32,
    ) -> Self {
        Self {
            store,
            provider,
            cache,
            quota,
            page_size,
        }
    }

    pub async fn search(
        &self,
        user_id: &str,
        preferences: &SearchPreferences,
    ) -> Result<SearchResponse, SearchError> {
        let now = Utc::now();
        let month = month_key(now);
        let normalized = normalize_query(preferences);

        // Everything already fetched for this user this month is served
        // before any quota or upstream traffic.
        match self.store.collection_for_month(user_id, &month).await {
            Ok(collection) if !collection.is_empty() => {
                let listings =
                    dedupe_by_job_id(collection.into_iter().map(|r| r.listing).collect());
                let total = listings.len();

                let mut ranked = rank(listings, preferences, now);
                ranked.truncate(RESULTS_PER_SEARCH);
                for job in &mut ranked {
                    truncate_description(&mut job.listing);
                }

                info!("Serving {total} collected jobs for {user_id} ({month})");

                return Ok(SearchResponse {
                    jobs: ranked,
                    meta: SearchMeta {
                        total,
                        query: normalized.query,
                        location: non_empty(&normalized.location),
                        from_user_collection: true,
                        remaining_searches: None,
                        quota_used: None,
                        max_searches: None,
                        message: Some(
                            "Showing jobs from your collection for this month".to_string(),
                        ),
                    },
                });
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Could not read job collection for {user_id}, searching fresh: {e:#}");
            }
        }

        let check = self.quota.check_for_month(user_id, &month).await?;
        if !check.allowed {
            // A missing record means the check already degraded to its
            // fail-open defaults, which are always allowed.
            if let Some(record) = &check.record {
                return Err(SearchError::QuotaExceeded {
                    reset_date: next_reset_date(now),
                    used: record.searches_used,
                    max: record.max_searches,
                });
            }
        }

        let listings = match self.cache.get_at(&normalized, now) {
            Some(cached) => cached,
            None => {
                let fetched = self
                    .provider
                    .search(&normalized, self.page_size)
                    .await
                    .map_err(|e| SearchError::External(e.to_string()))?;
                self.cache.put_at(&normalized, fetched.clone(), now);
                fetched
            }
        };

        if listings.is_empty() {
            return Ok(SearchResponse {
                jobs: Vec::new(),
                meta: SearchMeta {
                    total: 0,
                    query: normalized.query,
                    location: non_empty(&normalized.location),
                    from_user_collection: false,
                    remaining_searches: Some(check.remaining),
                    quota_used: check.record.as_ref().map(|r| r.searches_used),
                    max_searches: check.record.as_ref().map(|r| r.max_searches),
                    message: Some(
                        "No jobs found. Try adjusting your search preferences.".to_string(),
                    ),
                },
            });
        }

        let top: Vec<_> = listings
            .into_iter()
            .take(RESULTS_PER_SEARCH)
            .collect();
        let mut ranked = rank(top, preferences, now);
        for job in &mut ranked {
            truncate_description(&mut job.listing);
        }

        // Bookkeeping is best-effort: the user already has their results,
        // so persistence problems are logged rather than surfaced.
        let location = non_empty(&normalized.location);
        let (history, updated) = tokio::join!(
            self.store.append_search_history(
                user_id,
                &normalized.query,
                location.as_deref(),
                Some(&normalized.employment_type),
                preferences.experience.as_deref(),
                &ranked,
                &month,
            ),
            self.quota.increment_for_month(user_id, &month),
        );

        if let Err(e) = history {
            warn!("Failed to record search history for {user_id}: {e:#}");
        }
        let updated = match updated {
            Ok(model) => model,
            Err(e) => {
                warn!("Failed to count search against quota for {user_id}: {e:#}");
                None
            }
        };

        let (quota_used, max_searches) = updated.as_ref().map_or_else(
            || {
                let max = check
                    .record
                    .as_ref()
                    .map_or(self.quota.max_searches(), |r| r.max_searches);
                let used = check.record.as_ref().map_or(0, |r| r.searches_used) + 1;
                (used, max)
            },
            |record| (record.searches_used, record.max_searches),
        );
        let remaining = (max_searches - quota_used).max(0);

        info!(
            "Fresh search for {user_id}: {} jobs, {remaining}/{max_searches} searches left",
            ranked.len()
        );

        Ok(SearchResponse {
            meta: SearchMeta {
                total: ranked.len(),
                query: normalized.query,
                location,
                from_user_collection: false,
                remaining_searches: Some(remaining),
                quota_used: Some(quota_used),
                max_searches: Some(max_searches),
                message: None,
            },
            jobs: ranked,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Builds the provider-facing query from raw preferences. The role is the
/// query backbone; experience text is appended when present so the upstream
/// full-text search can use it.
fn normalize_query(preferences: &SearchPreferences) -> SearchQuery {
    use crate::clients::jsearch::{format_employment_type, format_location};

    let mut query = preferences.role.trim().to_string();
    if let Some(experience) = preferences.experience.as_deref() {
        let experience = experience.trim();
        if !experience.is_empty() {
            query = format!("{query} {experience}");
        }
    }

    SearchQuery {
        query,
        location: preferences
            .location
            .as_deref()
            .map(format_location)
            .unwrap_or_default(),
        employment_type: format_employment_type(
            preferences.job_type.as_deref().unwrap_or("full time job"),
        ),
        page: 1,
    }
}
