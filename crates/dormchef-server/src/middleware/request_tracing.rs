// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::extract_request_trace;
use crate::http::response_contract::api_error_response;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use dormchef_api::ApiError;
use std::time::Instant;
use tracing::{info, Instrument};

/// Runs the request inside an `http.request` span, echoes the request id
/// in `x-request-id` and stamps it into error bodies.
pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let trace = extract_request_trace(request.headers(), &state);

    let span = tracing::info_span!(
        "http.request",
        request_id = %trace.request_id,
        method = %method,
        route = %route,
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    if let Some(err) = response.extensions_mut().remove::<ApiError>() {
        let status = response.status();
        response = api_error_response(status, err.with_request_id(trace.request_id.clone()));
    }
    if let Ok(value) = HeaderValue::from_str(&trace.request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );
    });
    response
}
