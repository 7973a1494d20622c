// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dormchef_api::{api_error_status, ApiError};
use dormchef_store::StoreError;
use serde_json::json;
use tracing::error;

#[must_use]
pub(crate) fn api_error_status_code(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(api_error_status(err.code)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[must_use]
pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(json!({"error": err}))).into_response()
}

/// Error returned by handlers and extractors. The response carries the
/// `ApiError` as an extension so the tracing middleware can stamp the
/// request id into the body.
#[derive(Debug)]
pub struct HandlerError(pub ApiError);

impl From<ApiError> for HandlerError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        Self(store_error_to_api(&err))
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = api_error_status_code(&self.0);
        let mut resp = api_error_response(status, self.0.clone());
        resp.extensions_mut().insert(self.0);
        resp
    }
}

pub(crate) type HandlerResult<T> = Result<T, HandlerError>;

fn resource_label(what: &str) -> String {
    let mut chars = what.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Resource".to_string(),
    }
}

pub(crate) fn store_error_to_api(err: &StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => ApiError::not_found(&resource_label(what)),
        StoreError::Conflict(message) => ApiError::conflict(message.clone()),
        other => {
            error!(error = %other, "store operation failed");
            ApiError::internal("internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dormchef_api::ApiErrorCode;

    #[test]
    fn store_errors_map_to_wire_codes() {
        let err = store_error_to_api(&StoreError::NotFound("meal plan item"));
        assert_eq!(err.code, ApiErrorCode::NotFound);
        assert_eq!(err.message, "Meal plan item not found");

        let err = store_error_to_api(&StoreError::Conflict("Already following user".into()));
        assert_eq!(err.code, ApiErrorCode::Conflict);
        assert_eq!(api_error_status_code(&err), StatusCode::BAD_REQUEST);

        let err = store_error_to_api(&StoreError::Corrupt("bad tags".into()));
        assert_eq!(err.code, ApiErrorCode::Internal);
        assert_eq!(err.message, "internal error");
    }
}
