use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{prelude::*, user_saved_jobs};
use crate::models::JobListing;

/// Outcome of a save attempt; a duplicate is surfaced as a distinct case so
/// the API can answer 409 instead of 500.
pub enum SaveOutcome {
    Saved(user_saved_jobs::Model),
    AlreadySaved,
}

pub struct SavedJobRepository {
    conn: DatabaseConnection,
}

impl SavedJobRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn save(
        &self,
        user_id: &str,
        job: &JobListing,
        match_score: i32,
    ) -> Result<SaveOutcome> {
        let job_data = serde_json::to_string(job)?;

        let active = user_saved_jobs::ActiveModel {
            user_id: Set(user_id.to_string()),
            job_id: Set(job.job_id.clone()),
            job_data: Set(job_data),
            match_score: Set(match_score),
            is_applied: Set(false),
            is_favorited: Set(true),
            saved_at: Set(chrono::Utc::now().to_rfc3339()),
            applied_at: Set(None),
            notes: Set(None),
            ..Default::default()
        };

        match UserSavedJobs::insert(active)
            .exec_with_returning(&self.conn)
            .await
        {
            Ok(model) => Ok(SaveOutcome::Saved(model)),
            Err(e) if e.to_string().contains("UNIQUE") => Ok(SaveOutcome::AlreadySaved),
            Err(e) => Err(e).context("Failed to save job"),
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<user_saved_jobs::Model>> {
        UserSavedJobs::find()
            .filter(user_saved_jobs::Column::UserId.eq(user_id))
            .order_by_desc(user_saved_jobs::Column::SavedAt)
            .all(&self.conn)
            .await
            .context("Failed to list saved jobs")
    }

    pub async fn delete(&self, user_id: &str, job_id: &str) -> Result<bool> {
        let result = UserSavedJobs::delete_many()
            .filter(user_saved_jobs::Column::UserId.eq(user_id))
            .filter(user_saved_jobs::Column::JobId.eq(job_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete saved job")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_applied(&self, user_id: &str, job_id: &str) -> Result<bool> {
        let existing = UserSavedJobs::find()
            .filter(user_saved_jobs::Column::UserId.eq(user_id))
            .filter(user_saved_jobs::Column::JobId.eq(job_id))
            .one(&self.conn)
            .await
            .context("Failed to query saved job")?;

        let Some(model) = existing else {
            return Ok(false);
        };

        let mut active: user_saved_jobs::ActiveModel = model.into();
        active.is_applied = Set(true);
        active.applied_at = Set(Some(chrono::Utc::now().to_rfc3339()));
        active.update(&self.conn).await?;

        Ok(true)
    }

    pub async fn count(&self, user_id: &str) -> Result<u64> {
        UserSavedJobs::find()
            .filter(user_saved_jobs::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count saved jobs")
    }
}
