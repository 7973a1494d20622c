// SPDX-License-Identifier: Apache-2.0

use super::{HandlerError, HandlerResult};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use dormchef_api::{openapi_v1_spec, ApiError, VersionResponse};
use serde_json::Value;
use tracing::warn;

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> HandlerResult<&'static str> {
    match state.db.ping().await {
        Ok(()) => Ok("ready"),
        Err(e) => {
            warn!(error = %e, "readiness probe failed");
            Err(HandlerError::from(ApiError::not_ready("database unavailable")))
        }
    }
}

pub(crate) async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: crate::CRATE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: dormchef_store::SCHEMA_VERSION,
    })
}

pub(crate) async fn openapi_handler() -> Json<Value> {
    Json(openapi_v1_spec())
}
