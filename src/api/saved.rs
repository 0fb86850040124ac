use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::UserId;
use super::{ApiError, ApiResponse, AppState, SaveJobRequest, SavedJobDto};
use crate::db::SaveOutcome;

/// `POST /api/jobs/save`
pub async fn save_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
    Json(request): Json<SaveJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.job.job_id.trim().is_empty() {
        return Err(ApiError::validation("Job ID is required"));
    }

    let outcome = state
        .store()
        .save_job(user.as_str(), &request.job, request.match_score)
        .await?;

    match outcome {
        SaveOutcome::Saved(model) => Ok(Json(ApiResponse::success(SavedJobDto::from(model)))),
        SaveOutcome::AlreadySaved => Err(ApiError::Conflict("Job already saved".to_string())),
    }
}

/// `GET /api/jobs/saved`
pub async fn list_saved_jobs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = state.store().list_saved_jobs(user.as_str()).await?;
    let dtos: Vec<SavedJobDto> = jobs.into_iter().map(SavedJobDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// `DELETE /api/jobs/saved/{job_id}`
pub async fn delete_saved_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state.store().delete_saved_job(user.as_str(), &job_id).await?;
    if removed {
        Ok(Json(ApiResponse::success(serde_json::json!({
            "removed": job_id
        }))))
    } else {
        Err(ApiError::saved_job_not_found(&job_id))
    }
}

/// `POST /api/jobs/saved/{job_id}/applied`
pub async fn mark_applied(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserId>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.store().mark_job_applied(user.as_str(), &job_id).await?;
    if updated {
        Ok(Json(ApiResponse::success(serde_json::json!({
            "applied": job_id
        }))))
    } else {
        Err(ApiError::saved_job_not_found(&job_id))
    }
}
