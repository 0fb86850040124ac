use serde::{Deserialize, Serialize};

use crate::models::{JobListing, RankedJob};
use crate::services::SearchMeta;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Top-level body for `POST /search/jobs`. Unlike the generic envelope the
/// ranked jobs sit at the root, matching what the frontend renders.
#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    pub success: bool,
    pub jobs: Vec<RankedJob>,
    pub meta: SearchMeta,
}

#[derive(Debug, Deserialize)]
pub struct SaveJobRequest {
    pub job: JobListing,
    #[serde(rename = "matchScore", default)]
    pub match_score: i32,
}

#[derive(Debug, Serialize)]
pub struct SavedJobDto {
    pub id: i32,
    pub job_id: String,
    pub job: serde_json::Value,
    #[serde(rename = "matchScore")]
    pub match_score: i32,
    pub is_applied: bool,
    pub is_favorited: bool,
    pub saved_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<crate::entities::user_saved_jobs::Model> for SavedJobDto {
    fn from(model: crate::entities::user_saved_jobs::Model) -> Self {
        let job = serde_json::from_str(&model.job_data)
            .unwrap_or(serde_json::Value::Null);
        Self {
            id: model.id,
            job_id: model.job_id,
            job,
            match_score: model.match_score,
            is_applied: model.is_applied,
            is_favorited: model.is_favorited,
            saved_at: model.saved_at,
            applied_at: model.applied_at,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuotaStatusDto {
    pub month: String,
    pub used: i32,
    pub max: i32,
    pub remaining: i32,
    #[serde(rename = "resetDate")]
    pub reset_date: String,
}

#[derive(Debug, Serialize)]
pub struct JobStatusDto {
    pub month: String,
    pub used: i32,
    pub max: i32,
    pub remaining: i32,
    pub usage_percentage: u32,
    pub near_limit: bool,
    pub at_limit: bool,
    pub collection_size: usize,
}

#[derive(Debug, Serialize)]
pub struct StatisticsDto {
    pub total_searches: u64,
    pub total_jobs_fetched: u64,
    pub saved_jobs: u64,
    pub searches_this_month: i32,
}

#[derive(Debug, Serialize)]
pub struct SystemStatusDto {
    pub version: String,
    pub uptime_seconds: u64,
    pub database: String,
}
