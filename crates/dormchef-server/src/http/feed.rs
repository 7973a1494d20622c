// SPDX-License-Identifier: Apache-2.0

use super::HandlerResult;
use crate::auth::Session;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use dormchef_planner::{merge_feed, FeedItem};
use dormchef_store::{following_ids, recent_plan_items_by_users, recent_recipes_by_authors};

/// Newest recipes and plan additions of everyone the caller follows.
pub(crate) async fn feed_handler(
    State(state): State<AppState>,
    session: Session,
) -> HandlerResult<Json<Vec<FeedItem>>> {
    let caller = session.user_id;
    let limit = state.config.feed_limit;
    let (recipes, activity) = state
        .db
        .call(move |conn| {
            let followed = following_ids(conn, &caller)?;
            let recipes = recent_recipes_by_authors(conn, &followed, limit)?;
            let activity = recent_plan_items_by_users(conn, &followed, limit)?;
            Ok((recipes, activity))
        })
        .await?;
    Ok(Json(merge_feed(recipes, activity, limit)))
}
