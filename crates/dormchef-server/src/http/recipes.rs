// SPDX-License-Identifier: Apache-2.0

use super::extract::{ApiJson, QueryPairs};
use super::HandlerResult;
use crate::auth::{MaybeSession, Session};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use dormchef_api::{
    parse_recipe_list_params, parse_recipe_path, ApiError, CreateRecipeRequest, SuccessResponse,
};
use dormchef_model::Recipe;
use dormchef_store::{create_recipe, delete_recipe, get_recipe, list_recipes, recipe_author};
use tracing::info;

pub(crate) async fn list_recipes_handler(
    State(state): State<AppState>,
    QueryPairs(query): QueryPairs,
) -> HandlerResult<Json<Vec<Recipe>>> {
    let filter = parse_recipe_list_params(&query)?;
    let recipes = state
        .db
        .call(move |conn| list_recipes(conn, &filter))
        .await?;
    Ok(Json(recipes))
}

pub(crate) async fn create_recipe_handler(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<CreateRecipeRequest>,
) -> HandlerResult<Json<Recipe>> {
    let new = body.validate()?;
    let author = session.user_id;
    let recipe = state
        .db
        .call(move |conn| create_recipe(conn, &author, &new))
        .await?;
    info!(recipe_id = %recipe.id, author_id = %recipe.author_id, "recipe created");
    Ok(Json(recipe))
}

pub(crate) async fn get_recipe_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Path(raw_id): Path<String>,
) -> HandlerResult<Json<Recipe>> {
    let id = parse_recipe_path(&raw_id)?;
    let viewer = session.map(|s| s.user_id);
    state
        .db
        .call(move |conn| get_recipe(conn, &id, viewer.as_ref()))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Recipe").into())
}

pub(crate) async fn delete_recipe_handler(
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> HandlerResult<Json<SuccessResponse>> {
    let id = parse_recipe_path(&raw_id)?;
    let caller = session.user_id;
    // None: no such recipe; Some(false): someone else's recipe.
    let outcome = state
        .db
        .call(move |conn| {
            let tx = conn.transaction()?;
            let outcome = match recipe_author(&tx, &id)? {
                None => None,
                Some(author) if author != caller => Some(false),
                Some(_) => Some(delete_recipe(&tx, &id)?),
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await?;
    match outcome {
        None => Err(ApiError::not_found("Recipe").into()),
        Some(false) => Err(ApiError::forbidden().into()),
        Some(true) => Ok(Json(SuccessResponse::OK)),
    }
}
