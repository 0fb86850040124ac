use axum::{Extension, Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::auth::UserId;
use super::{ApiError, ApiResponse, AppState, StatisticsDto};

/// `GET /api/statistics`
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    let totals = state.store().search_totals(user.as_str()).await?;
    let saved_jobs = state.store().count_saved_jobs(user.as_str()).await?;
    let check = state.quota_service().check(user.as_str()).await?;

    let searches_this_month = check.record.as_ref().map_or(0, |r| r.searches_used);

    Ok(Json(ApiResponse::success(StatisticsDto {
        total_searches: totals.total_searches,
        total_jobs_fetched: totals.total_jobs_fetched,
        saved_jobs,
        searches_this_month,
    })))
}
