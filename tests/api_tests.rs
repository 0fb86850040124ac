use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use jobarr::clients::JobSearchProvider;
use jobarr::config::Config;
use jobarr::models::{JobListing, SearchQuery};
use std::sync::Arc;
use tower::ServiceExt;

struct StubProvider {
    listings: Vec<JobListing>,
}

#[async_trait::async_trait]
impl JobSearchProvider for StubProvider {
    async fn search(
        &self,
        _query: &SearchQuery,
        _page_size: u32,
    ) -> anyhow::Result<Vec<JobListing>> {
        Ok(self.listings.clone())
    }
}

fn listing(job_id: &str, title: &str) -> JobListing {
    serde_json::from_value(serde_json::json!({
        "job_id": job_id,
        "employer_name": "Acme Corp",
        "job_title": title,
        "job_description": "We are hiring a senior engineer to build systems.",
        "job_apply_link": "https://example.com/apply",
        "job_city": "Austin",
        "job_state": "TX",
        "job_country": "US",
        "job_employment_type": "FULLTIME",
        "job_is_remote": false,
    }))
    .unwrap()
}

async fn spawn_app_with(listings: Vec<JobListing>) -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let provider = Arc::new(StubProvider { listings });
    let shared = jobarr::state::SharedState::with_provider(config, provider)
        .await
        .expect("Failed to create app state");
    let state = jobarr::api::create_app_state(Arc::new(shared), None);
    jobarr::api::router(state).await
}

async fn spawn_app() -> Router {
    spawn_app_with(vec![
        listing("job-1", "Barista"),
        listing("job-2", "Senior Software Engineer"),
        listing("job-3", "Accountant"),
    ])
    .await
}

fn search_request(user: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/search/jobs")
        .header("x-user-id", user)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_user_id() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/search/jobs")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"role":"engineer"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/quota/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_system_status_is_public() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn test_search_requires_role() {
    let app = spawn_app().await;

    let response = app
        .oneshot(search_request("user-1", serde_json::json!({ "role": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Role is required");
}

#[tokio::test]
async fn test_fresh_search_ranks_and_reports_quota() {
    let app = spawn_app().await;

    let response = app
        .oneshot(search_request(
            "user-1",
            serde_json::json!({
                "role": "software engineer",
                "jobType": "full time job",
                "experience": "5 years",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["from_user_collection"], false);
    assert_eq!(body["meta"]["remaining_searches"], 2);
    assert_eq!(body["meta"]["quota_used"], 1);
    assert_eq!(body["meta"]["max_searches"], 3);

    // The title match rises to the top with its score attached.
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[0]["job_id"], "job-2");
    assert!(jobs[0]["matchScore"].as_i64().unwrap() > jobs[1]["matchScore"].as_i64().unwrap());
}

#[tokio::test]
async fn test_repeat_search_serves_personal_collection() {
    let app = spawn_app().await;
    let prefs = serde_json::json!({ "role": "software engineer" });

    let response = app
        .clone()
        .oneshot(search_request("user-1", prefs.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(search_request("user-1", prefs))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["meta"]["from_user_collection"], true);
    assert!(body["meta"]["message"].is_string());
}

#[tokio::test]
async fn test_exhausted_quota_returns_429_with_reset_date() {
    // An empty provider keeps every search on the fresh path but consumes
    // nothing, so exhaust the ledger directly through saved state.
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    let provider = Arc::new(StubProvider {
        listings: vec![listing("job-1", "Engineer")],
    });
    let shared = jobarr::state::SharedState::with_provider(config, provider)
        .await
        .unwrap();

    let month = chrono::Utc::now().format("%Y-%m").to_string();
    shared.store.ensure_quota("user-1", &month, 3).await.unwrap();
    for _ in 0..3 {
        shared.store.increment_quota("user-1", &month).await.unwrap();
    }

    let state = jobarr::api::create_app_state(Arc::new(shared), None);
    let app = jobarr::api::router(state).await;

    let response = app
        .oneshot(search_request(
            "user-1",
            serde_json::json!({ "role": "engineer" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Monthly search limit reached");
    assert_eq!(body["remaining"], 0);
    assert_eq!(body["quota"]["used"], 3);
    assert_eq!(body["quota"]["max"], 3);

    let reset_date = body["resetDate"].as_str().unwrap();
    assert!(reset_date.ends_with("-01"));
}

#[tokio::test]
async fn test_saved_jobs_crud() {
    let app = spawn_app().await;
    let job = serde_json::json!({
        "job": {
            "job_id": "job-42",
            "employer_name": "Acme Corp",
            "job_title": "Engineer",
            "job_description": "Build things",
            "job_apply_link": "https://example.com",
        },
        "matchScore": 85,
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs/save")
                .header("x-user-id", "user-1")
                .header("Content-Type", "application/json")
                .body(Body::from(job.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["job_id"], "job-42");
    assert_eq!(body["data"]["matchScore"], 85);

    // Saving the same job again conflicts.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs/save")
                .header("x-user-id", "user-1")
                .header("Content-Type", "application/json")
                .body(Body::from(job.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/jobs/saved")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs/saved/job-42/applied")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/jobs/saved/job-42")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone now.
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/jobs/saved/job-42")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quota_status_reflects_usage() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/quota/status")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["used"], 0);
    assert_eq!(body["data"]["remaining"], 3);

    app.clone()
        .oneshot(search_request(
            "user-1",
            serde_json::json!({ "role": "engineer" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/quota/status")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["used"], 1);
    assert_eq!(body["data"]["remaining"], 2);
    assert_eq!(body["data"]["max"], 3);
}

#[tokio::test]
async fn test_job_status_reports_collection_and_flags() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/jobs/status")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["used"], 0);
    assert_eq!(body["data"]["collection_size"], 0);
    assert_eq!(body["data"]["near_limit"], false);
    assert_eq!(body["data"]["at_limit"], false);

    app.clone()
        .oneshot(search_request(
            "user-1",
            serde_json::json!({ "role": "engineer" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs/status")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["used"], 1);
    assert_eq!(body["data"]["usage_percentage"], 33);
    assert_eq!(body["data"]["collection_size"], 3);
}

#[tokio::test]
async fn test_statistics_counts_searches_and_saves() {
    let app = spawn_app().await;

    app.clone()
        .oneshot(search_request(
            "user-1",
            serde_json::json!({ "role": "engineer" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/statistics")
                .header("x-user-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["data"]["total_searches"], 1);
    assert_eq!(body["data"]["total_jobs_fetched"], 3);
    assert_eq!(body["data"]["saved_jobs"], 0);
    assert_eq!(body["data"]["searches_this_month"], 1);
}

#[tokio::test]
async fn test_users_do_not_share_collections() {
    let app = spawn_app().await;
    let prefs = serde_json::json!({ "role": "software engineer" });

    let response = app
        .clone()
        .oneshot(search_request("user-1", prefs.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A different user's first search is still fresh.
    let response = app
        .oneshot(search_request("user-2", prefs))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["meta"]["from_user_collection"], false);
}
