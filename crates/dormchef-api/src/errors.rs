// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    ValidationFailed,
    InvalidQueryParameter,
    MissingParameter,
    InvalidBody,
    Conflict,
    PayloadTooLarge,
    NotReady,
    Timeout,
    Internal,
}

impl ApiErrorCode {
    pub const ALL: [Self; 13] = [
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::MethodNotAllowed,
        Self::ValidationFailed,
        Self::InvalidQueryParameter,
        Self::MissingParameter,
        Self::InvalidBody,
        Self::Conflict,
        Self::PayloadTooLarge,
        Self::NotReady,
        Self::Timeout,
        Self::Internal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::ValidationFailed => "ValidationFailed",
            Self::InvalidQueryParameter => "InvalidQueryParameter",
            Self::MissingParameter => "MissingParameter",
            Self::InvalidBody => "InvalidBody",
            Self::Conflict => "Conflict",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::NotReady => "NotReady",
            Self::Timeout => "Timeout",
            Self::Internal => "Internal",
        }
    }
}

pub const UNKNOWN_REQUEST_ID: &str = "req-unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

/// Wire shape of every error body: `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiError,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    fn simple(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message, json!({}), UNKNOWN_REQUEST_ID)
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::simple(ApiErrorCode::Unauthorized, "Unauthorized")
    }

    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::simple(ApiErrorCode::Unauthorized, "Invalid email or password")
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::simple(ApiErrorCode::Forbidden, "Forbidden")
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{what} not found"),
            json!({"resource": what}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::simple(ApiErrorCode::Conflict, message)
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn missing_param(name: &str) -> Self {
        Self::new(
            ApiErrorCode::MissingParameter,
            format!("{name} parameter is required"),
            json!({"parameter": name}),
            UNKNOWN_REQUEST_ID,
        )
    }

    /// `field_errors` is a JSON array of `{field, reason, message}`; the
    /// first entry's message becomes the error message.
    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        let message = field_errors
            .get(0)
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("validation failed")
            .to_string();
        Self::new(
            ApiErrorCode::ValidationFailed,
            message,
            json!({"field_errors": field_errors}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(
            ApiErrorCode::InvalidBody,
            "invalid request body",
            json!({"reason": reason}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            ApiErrorCode::PayloadTooLarge,
            "request body too large",
            json!({"max_body_bytes": limit}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn method_not_allowed(method: &str) -> Self {
        Self::new(
            ApiErrorCode::MethodNotAllowed,
            "Method not allowed",
            json!({"method": method}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::NotReady,
            "service not ready",
            json!({"reason": reason.into()}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn timeout(limit_ms: u64) -> Self {
        Self::new(
            ApiErrorCode::Timeout,
            "request timed out",
            json!({"timeout_ms": limit_ms}),
            UNKNOWN_REQUEST_ID,
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::simple(ApiErrorCode::Internal, message)
    }

    #[must_use]
    pub fn into_envelope(self) -> ErrorEnvelope {
        ErrorEnvelope { error: self }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
