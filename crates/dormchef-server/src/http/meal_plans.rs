// SPDX-License-Identifier: Apache-2.0

use super::extract::{ApiJson, QueryPairs};
use super::HandlerResult;
use crate::auth::Session;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use dormchef_api::{
    parse_plan_item_path, parse_week_param, AddMealPlanItemRequest, ApiError, GroceryRequest,
    SuccessResponse,
};
use dormchef_model::{MealPlan, MealPlanItem};
use dormchef_planner::{build_grocery_list, GroceryList};
use dormchef_store::{
    add_meal_plan_item, delete_meal_plan_item, find_meal_plan, get_or_create_meal_plan,
    meal_plan_item_owner,
};
use tracing::{debug, info};

pub(crate) async fn get_meal_plan_handler(
    State(state): State<AppState>,
    session: Session,
    QueryPairs(query): QueryPairs,
) -> HandlerResult<Json<MealPlan>> {
    let week = parse_week_param(&query)?;
    let user = session.user_id;
    let plan = state
        .db
        .call(move |conn| get_or_create_meal_plan(conn, &user, week))
        .await?;
    Ok(Json(plan))
}

pub(crate) async fn add_meal_plan_item_handler(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<AddMealPlanItemRequest>,
) -> HandlerResult<Json<MealPlanItem>> {
    let new = body.validate()?;
    let user = session.user_id;
    let item = state
        .db
        .call(move |conn| add_meal_plan_item(conn, &user, &new))
        .await?;
    info!(
        item_id = %item.id,
        recipe_id = %item.recipe_id,
        day_index = item.day_index.get(),
        meal_type = item.meal_type.as_str(),
        "meal plan item added"
    );
    Ok(Json(item))
}

pub(crate) async fn delete_meal_plan_item_handler(
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> HandlerResult<Json<SuccessResponse>> {
    let id = parse_plan_item_path(&raw_id)?;
    let caller = session.user_id;
    // None: no such item; Some(false): item on another user's plan.
    let outcome = state
        .db
        .call(move |conn| {
            let tx = conn.transaction()?;
            let outcome = match meal_plan_item_owner(&tx, &id)? {
                None => None,
                Some(owner) if owner != caller => Some(false),
                Some(_) => Some(delete_meal_plan_item(&tx, &id)?),
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await?;
    match outcome {
        None => Err(ApiError::not_found("Meal plan item").into()),
        Some(false) => Err(ApiError::forbidden().into()),
        Some(true) => Ok(Json(SuccessResponse::OK)),
    }
}

pub(crate) async fn grocery_handler(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<GroceryRequest>,
) -> HandlerResult<Json<GroceryList>> {
    let week = body.validate()?;
    let user = session.user_id;
    let plan = state
        .db
        .call(move |conn| find_meal_plan(conn, &user, week))
        .await?;
    let items = plan.map(|p| p.items).unwrap_or_default();
    let list = build_grocery_list(&items);
    debug!(
        week_of = %week,
        planned = items.len(),
        lines = list.items.len(),
        "grocery list built"
    );
    Ok(Json(list))
}
