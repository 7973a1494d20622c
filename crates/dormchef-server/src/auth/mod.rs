// SPDX-License-Identifier: Apache-2.0

//! Password storage and bearer-token sessions.

mod password;
mod token;

pub use password::{
    hash_password, hash_password_with_salt, verify_password, DEFAULT_PASSWORD_ROUNDS,
    PASSWORD_SCHEME,
};
pub use token::{IssuedToken, SessionKeys, TokenError};

use crate::http::HandlerError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use dormchef_api::ApiError;
use dormchef_model::{now_utc, UserId};
use tracing::debug;

/// An authenticated caller. Rejects with 401 when the request carries no
/// valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

/// Like [`Session`] but anonymous callers (and bad tokens) pass through
/// as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeSession(pub Option<Session>);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("authorization")?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

fn resolve_session(headers: &HeaderMap, state: &AppState) -> Result<Session, TokenError> {
    let token = bearer_token(headers).ok_or(TokenError::Malformed)?;
    let user_id = state.sessions.verify(token, now_utc())?;
    Ok(Session { user_id })
}

impl FromRequestParts<AppState> for Session {
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_session(&parts.headers, state).map_err(|e| {
            debug!(reason = %e, "session rejected");
            HandlerError::from(ApiError::unauthorized())
        })
    }
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_session(&parts.headers, state).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
