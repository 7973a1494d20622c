// SPDX-License-Identifier: Apache-2.0

use super::extract::ApiJson;
use super::{HandlerError, HandlerResult};
use crate::auth::{hash_password, verify_password, Session};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use chrono::SecondsFormat;
use dormchef_api::{ApiError, LoginRequest, RegisterRequest, SessionResponse};
use dormchef_model::{now_utc, User};
use dormchef_store::{create_user, find_user, find_user_by_email, NewUser};
use tracing::info;

fn session_response(state: &AppState, user: User) -> SessionResponse {
    let issued = state.sessions.issue(&user.id, now_utc());
    SessionResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        user,
    }
}

/// Key stretching is CPU-bound; keep it off the async workers.
async fn blocking<T, F>(f: F) -> HandlerResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| HandlerError::from(ApiError::internal(format!("worker failed: {e}"))))
}

pub(crate) async fn register_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> HandlerResult<Json<SessionResponse>> {
    let input = body.validate()?;
    let rounds = state.config.password_rounds;
    let password = input.password;
    let password_hash = blocking(move || hash_password(&password, rounds)).await?;
    let new = NewUser {
        name: input.name,
        email: input.email,
        password_hash,
        image: None,
    };
    let user = state.db.call(move |conn| create_user(conn, &new)).await?;
    info!(user_id = %user.id, "user registered");
    Ok(Json(session_response(&state, user)))
}

pub(crate) async fn login_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> HandlerResult<Json<SessionResponse>> {
    let (email, password) = body.validate()?;
    let found = state
        .db
        .call(move |conn| find_user_by_email(conn, &email))
        .await?;
    let Some(credentials) = found else {
        return Err(ApiError::invalid_credentials().into());
    };
    let stored = credentials.password_hash;
    if !blocking(move || verify_password(&password, &stored)).await? {
        return Err(ApiError::invalid_credentials().into());
    }
    Ok(Json(session_response(&state, credentials.user)))
}

pub(crate) async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> HandlerResult<Json<User>> {
    let id = session.user_id;
    state
        .db
        .call(move |conn| find_user(conn, &id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::unauthorized().into())
}
