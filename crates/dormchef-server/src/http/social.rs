// SPDX-License-Identifier: Apache-2.0

use super::extract::{ApiJson, QueryPairs};
use super::HandlerResult;
use crate::auth::Session;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use dormchef_api::{
    parse_user_id_param, ApiError, FollowRequest, LikeRequest, LikeResponse, SuccessResponse,
};
use dormchef_model::Follow;
use dormchef_store::{create_follow, delete_follow, toggle_like};
use tracing::info;

pub(crate) async fn follow_handler(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<FollowRequest>,
) -> HandlerResult<Json<Follow>> {
    let target = body.validate()?;
    let caller = session.user_id;
    if target == caller {
        return Err(ApiError::conflict("Cannot follow yourself").into());
    }
    let follow = state
        .db
        .call(move |conn| create_follow(conn, &caller, &target))
        .await?;
    info!(from_id = %follow.from_id, to_id = %follow.to_id, "follow created");
    Ok(Json(follow))
}

pub(crate) async fn unfollow_handler(
    State(state): State<AppState>,
    session: Session,
    QueryPairs(query): QueryPairs,
) -> HandlerResult<Json<SuccessResponse>> {
    let target = parse_user_id_param(&query)?;
    let caller = session.user_id;
    let removed = state
        .db
        .call(move |conn| delete_follow(conn, &caller, &target))
        .await?;
    if removed {
        Ok(Json(SuccessResponse::OK))
    } else {
        Err(ApiError::not_found("Follow").into())
    }
}

pub(crate) async fn like_handler(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<LikeRequest>,
) -> HandlerResult<Json<LikeResponse>> {
    let recipe = body.validate()?;
    let caller = session.user_id;
    let liked = state
        .db
        .call(move |conn| toggle_like(conn, &caller, &recipe))
        .await?;
    Ok(Json(LikeResponse { liked }))
}
