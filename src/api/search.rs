use axum::{Extension, Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::auth::UserId;
use super::{ApiError, AppState, SearchResponseBody};
use crate::models::SearchPreferences;

/// `POST /api/search/jobs`
pub async fn search_jobs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
    Json(preferences): Json<SearchPreferences>,
) -> Result<impl IntoResponse, ApiError> {
    if preferences.role.trim().is_empty() {
        return Err(ApiError::validation("Role is required"));
    }

    let response = state
        .search_service()
        .search(user.as_str(), &preferences)
        .await?;

    let source = if response.meta.from_user_collection {
        "collection"
    } else {
        "fresh"
    };
    let labels = [("source", source.to_string())];
    metrics::counter!("job_searches_total", &labels).increment(1);

    Ok(Json(SearchResponseBody {
        success: true,
        jobs: response.jobs,
        meta: response.meta,
    }))
}
