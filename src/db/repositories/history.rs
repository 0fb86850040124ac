use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{prelude::*, user_job_searches};
use crate::models::RankedJob;

/// Lifetime search totals for the statistics endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchTotals {
    pub total_searches: u64,
    pub total_jobs_fetched: u64,
}

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn append(
        &self,
        user_id: &str,
        query: &str,
        location: Option<&str>,
        employment_type: Option<&str>,
        experience: Option<&str>,
        jobs: &[RankedJob],
        month_year: &str,
    ) -> Result<user_job_searches::Model> {
        let job_data = serde_json::to_string(jobs)?;

        let active = user_job_searches::ActiveModel {
            user_id: Set(user_id.to_string()),
            search_query: Set(query.to_string()),
            search_location: Set(location.map(str::to_string)),
            search_employment_type: Set(employment_type.map(str::to_string)),
            search_experience: Set(experience.map(str::to_string)),
            job_data: Set(job_data),
            month_year: Set(month_year.to_string()),
            search_timestamp: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = UserJobSearches::insert(active)
            .exec_with_returning(&self.conn)
            .await
            .context("Failed to append search history")?;

        Ok(result)
    }

    pub async fn list_for_month(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Vec<user_job_searches::Model>> {
        UserJobSearches::find()
            .filter(user_job_searches::Column::UserId.eq(user_id))
            .filter(user_job_searches::Column::MonthYear.eq(month_year))
            .order_by_desc(user_job_searches::Column::SearchTimestamp)
            .all(&self.conn)
            .await
            .context("Failed to list search history")
    }

    /// Flattens every stored search this month into one job list. Rows with
    /// unreadable `job_data` are skipped rather than failing the whole read.
    pub async fn all_jobs_for_month(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Vec<RankedJob>> {
        let searches = self.list_for_month(user_id, month_year).await?;

        let mut jobs = Vec::new();
        for search in searches {
            match serde_json::from_str::<Vec<RankedJob>>(&search.job_data) {
                Ok(batch) => jobs.extend(batch),
                Err(e) => {
                    tracing::warn!("Skipping unreadable job_data for search {}: {e}", search.id);
                }
            }
        }

        Ok(jobs)
    }

    pub async fn totals(&self, user_id: &str) -> Result<SearchTotals> {
        let searches = UserJobSearches::find()
            .filter(user_job_searches::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await
            .context("Failed to query search history")?;

        let mut totals = SearchTotals {
            total_searches: searches.len() as u64,
            total_jobs_fetched: 0,
        };

        for search in &searches {
            if let Ok(batch) = serde_json::from_str::<Vec<serde_json::Value>>(&search.job_data) {
                totals.total_jobs_fetched += batch.len() as u64;
            }
        }

        Ok(totals)
    }
}
