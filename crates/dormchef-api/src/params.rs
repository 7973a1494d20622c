// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use dormchef_model::{MealPlanItemId, RecipeId, UserId, WeekOf};
use dormchef_store::RecipeFilter;
use std::collections::BTreeMap;

pub const MAX_SEARCH_BYTES: usize = 200;

/// `?search=` and `?tags=a,b`. Only the first non-empty tag narrows the
/// list; the rest are accepted and ignored.
pub fn parse_recipe_list_params(query: &BTreeMap<String, String>) -> Result<RecipeFilter, ApiError> {
    let search = query
        .get("search")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(value) = &search {
        if value.len() > MAX_SEARCH_BYTES {
            return Err(ApiError::invalid_param("search", value));
        }
    }
    let tag = query.get("tags").and_then(|raw| {
        raw.split(',')
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    });
    Ok(RecipeFilter { search, tag })
}

/// Required `?weekOf=`.
pub fn parse_week_param(query: &BTreeMap<String, String>) -> Result<WeekOf, ApiError> {
    let raw = query
        .get("weekOf")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_param("weekOf"))?;
    WeekOf::parse(raw).map_err(|_| ApiError::invalid_param("weekOf", raw))
}

/// Required `?userId=` of the unfollow route.
pub fn parse_user_id_param(query: &BTreeMap<String, String>) -> Result<UserId, ApiError> {
    let raw = query
        .get("userId")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_param("userId"))?;
    UserId::parse(raw).map_err(|_| ApiError::invalid_param("userId", raw))
}

/// Path ids that fail to parse cannot name an existing row.
pub fn parse_recipe_path(raw: &str) -> Result<RecipeId, ApiError> {
    RecipeId::parse(raw).map_err(|_| ApiError::not_found("Recipe"))
}

pub fn parse_plan_item_path(raw: &str) -> Result<MealPlanItemId, ApiError> {
    MealPlanItemId::parse(raw).map_err(|_| ApiError::not_found("Meal plan item"))
}
