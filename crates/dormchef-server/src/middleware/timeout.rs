// SPDX-License-Identifier: Apache-2.0

use crate::http::HandlerError;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dormchef_api::ApiError;
use tracing::warn;

/// Answers 503 `Timeout` once the configured request budget is spent.
pub(crate) async fn request_timeout_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.config.request_timeout();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(timeout_ms = state.config.request_timeout_ms, "request timed out");
            HandlerError::from(ApiError::timeout(state.config.request_timeout_ms)).into_response()
        }
    }
}
