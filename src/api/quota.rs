use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use std::sync::Arc;

use super::auth::UserId;
use super::{ApiError, ApiResponse, AppState, QuotaStatusDto};
use crate::services::quota::{current_month_key, next_reset_date};

/// `GET /api/quota/status`
pub async fn quota_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    let check = state.quota_service().check(user.as_str()).await?;

    let (used, max) = check.record.as_ref().map_or_else(
        || (0, state.quota_service().max_searches()),
        |record| (record.searches_used, record.max_searches),
    );

    Ok(Json(ApiResponse::success(QuotaStatusDto {
        month: current_month_key(),
        used,
        max,
        remaining: check.remaining,
        reset_date: next_reset_date(Utc::now()),
    })))
}
