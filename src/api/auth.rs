use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::ApiError;

/// The caller's identity, extracted once by [`user_middleware`] and read by
/// handlers via `Extension<UserId>`.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Requires an `x-user-id` header on every protected route. Identity is
/// asserted upstream (gateway or frontend session); this service only
/// scopes data by it.
pub async fn user_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let user_id = headers
        .get("x-user-id")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match user_id {
        Some(id) => {
            tracing::Span::current().record("user_id", id);
            request.extensions_mut().insert(UserId(id.to_string()));
            next.run(request).await
        }
        None => ApiError::Unauthorized("User ID required".to_string()).into_response(),
    }
}
