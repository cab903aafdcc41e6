//! Optional shared-secret check.
//!
//! When the service is started with `ROOFAREA_API_SECRET`, callers must send
//! the same value in the `x-api-secret` header. Without a configured secret
//! every request passes through.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::handlers::ErrorResponse;
use crate::AppState;

/// Header carrying the shared secret.
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// Reject requests whose `x-api-secret` header does not match the configured secret.
pub async fn require_api_secret(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(secret) = state.api_secret.as_deref() {
        let provided = request
            .headers()
            .get(API_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());

        if provided != Some(secret) {
            tracing::warn!(
                header_present = provided.is_some(),
                "Rejected request with invalid secret header"
            );
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid secret header")),
            )
                .into_response();
        }
    }

    next.run(request).await
}
