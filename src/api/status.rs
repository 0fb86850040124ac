use axum::{Extension, Json, extract::State, response::IntoResponse};
use std::collections::HashSet;
use std::sync::Arc;

use super::auth::UserId;
use super::{ApiError, ApiResponse, AppState, JobStatusDto};
use crate::services::quota::current_month_key;

/// `GET /api/jobs/status`
///
/// Dashboard snapshot: quota position plus the size of this month's
/// deduplicated collection.
pub async fn job_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    let month = current_month_key();
    let check = state.quota_service().check(user.as_str()).await?;

    let (used, max) = check.record.as_ref().map_or_else(
        || (0, state.quota_service().max_searches()),
        |record| (record.searches_used, record.max_searches),
    );

    let collection_size = match state.store().collection_for_month(user.as_str(), &month).await {
        Ok(jobs) => {
            let unique: HashSet<&str> = jobs.iter().map(|j| j.listing.job_id.as_str()).collect();
            unique.len()
        }
        Err(e) => {
            tracing::warn!("Could not read collection for status: {e:#}");
            0
        }
    };

    let usage_percentage = if max > 0 {
        (f64::from(used) / f64::from(max) * 100.0).round() as u32
    } else {
        0
    };

    Ok(Json(ApiResponse::success(JobStatusDto {
        month,
        used,
        max,
        remaining: check.remaining,
        usage_percentage,
        near_limit: check.remaining == 1,
        at_limit: check.remaining == 0,
        collection_size,
    })))
}
