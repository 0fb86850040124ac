use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{user_job_searches, user_quotas, user_saved_jobs};
use crate::models::{JobListing, RankedJob};

pub mod migrator;
pub mod repositories;

pub use repositories::history::SearchTotals;
pub use repositories::saved_jobs::SaveOutcome;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn quota_repo(&self) -> repositories::quota::QuotaRepository {
        repositories::quota::QuotaRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    fn saved_jobs_repo(&self) -> repositories::saved_jobs::SavedJobRepository {
        repositories::saved_jobs::SavedJobRepository::new(self.conn.clone())
    }

    // Quota ledger

    pub async fn get_quota(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Option<user_quotas::Model>> {
        self.quota_repo().get(user_id, month_year).await
    }

    pub async fn ensure_quota(
        &self,
        user_id: &str,
        month_year: &str,
        max_searches: i32,
    ) -> Result<user_quotas::Model> {
        self.quota_repo()
            .ensure(user_id, month_year, max_searches)
            .await
    }

    pub async fn increment_quota(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Option<user_quotas::Model>> {
        self.quota_repo().increment(user_id, month_year).await
    }

    // Search history

    #[allow(clippy::too_many_arguments)]
    pub async fn append_search_history(
        &self,
        user_id: &str,
        query: &str,
        location: Option<&str>,
        employment_type: Option<&str>,
        experience: Option<&str>,
        jobs: &[RankedJob],
        month_year: &str,
    ) -> Result<user_job_searches::Model> {
        self.history_repo()
            .append(
                user_id,
                query,
                location,
                employment_type,
                experience,
                jobs,
                month_year,
            )
            .await
    }

    pub async fn collection_for_month(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Vec<RankedJob>> {
        self.history_repo()
            .all_jobs_for_month(user_id, month_year)
            .await
    }

    pub async fn search_totals(&self, user_id: &str) -> Result<SearchTotals> {
        self.history_repo().totals(user_id).await
    }

    // Saved jobs

    pub async fn save_job(
        &self,
        user_id: &str,
        job: &JobListing,
        match_score: i32,
    ) -> Result<SaveOutcome> {
        self.saved_jobs_repo().save(user_id, job, match_score).await
    }

    pub async fn list_saved_jobs(&self, user_id: &str) -> Result<Vec<user_saved_jobs::Model>> {
        self.saved_jobs_repo().list(user_id).await
    }

    pub async fn delete_saved_job(&self, user_id: &str, job_id: &str) -> Result<bool> {
        self.saved_jobs_repo().delete(user_id, job_id).await
    }

    pub async fn mark_job_applied(&self, user_id: &str, job_id: &str) -> Result<bool> {
        self.saved_jobs_repo().mark_applied(user_id, job_id).await
    }

    pub async fn count_saved_jobs(&self, user_id: &str) -> Result<u64> {
        self.saved_jobs_repo().count(user_id).await
    }
}
