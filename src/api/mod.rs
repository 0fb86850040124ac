use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod auth;
mod error;
mod observability;
mod quota;
mod saved;
mod search;
mod statistics;
mod status;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn search_service(&self) -> &crate::services::SearchService {
        &self.shared.search_service
    }

    #[must_use]
    pub fn quota_service(&self) -> &crate::services::QuotaService {
        &self.shared.quota_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.shared.config.read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = create_protected_router();

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search/jobs", post(search::search_jobs))
        .route("/jobs/status", get(status::job_status))
        .route("/jobs/save", post(saved::save_job))
        .route("/jobs/saved", get(saved::list_saved_jobs))
        .route("/jobs/saved/{job_id}", delete(saved::delete_saved_job))
        .route("/jobs/saved/{job_id}/applied", post(saved::mark_applied))
        .route("/quota/status", get(quota::quota_status))
        .route("/statistics", get(statistics::get_statistics))
        .route_layer(middleware::from_fn(auth::user_middleware))
}
