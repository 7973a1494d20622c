// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

pub const API_ERROR_SCHEMA_REF: &str = "#/components/schemas/ApiError";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
    pub schema_ref: &'static str,
}

/// HTTP status for each error code. `Conflict` stays at 400: clients treat
/// "already following" and "cannot follow yourself" as bad requests.
#[must_use]
pub const fn api_error_status(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::Unauthorized => 401,
        ApiErrorCode::Forbidden => 403,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::MethodNotAllowed => 405,
        ApiErrorCode::ValidationFailed
        | ApiErrorCode::InvalidQueryParameter
        | ApiErrorCode::MissingParameter
        | ApiErrorCode::InvalidBody
        | ApiErrorCode::Conflict => 400,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::NotReady | ApiErrorCode::Timeout => 503,
        ApiErrorCode::Internal => 500,
    }
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    ApiErrorMapping {
        status_code: api_error_status(error.code),
        schema_ref: API_ERROR_SCHEMA_REF,
    }
}
