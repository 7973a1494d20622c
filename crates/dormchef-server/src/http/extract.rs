// SPDX-License-Identifier: Apache-2.0

use super::HandlerError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use dormchef_api::ApiError;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// JSON body whose rejections use the error envelope.
#[derive(Debug)]
pub(crate) struct ApiJson<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection, state.config.max_body_bytes).into()),
        }
    }
}

fn json_rejection(rejection: &JsonRejection, limit: usize) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(limit)
    } else {
        ApiError::invalid_body(rejection.body_text())
    }
}

/// Raw query string pairs; the last occurrence of a repeated key wins.
#[derive(Debug, Default)]
pub(crate) struct QueryPairs(pub BTreeMap<String, String>);

impl FromRequestParts<AppState> for QueryPairs {
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map(|Query(pairs)| Self(pairs.into_iter().collect()))
            .map_err(|e| ApiError::invalid_param("query", &e.body_text()).into())
    }
}
