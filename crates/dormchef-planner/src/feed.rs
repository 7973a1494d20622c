// SPDX-License-Identifier: Apache-2.0

use dormchef_model::{DayIndex, MealPlanItem, MealType, Recipe, Timestamp, UserSummary};
use serde::{Deserialize, Serialize};

pub const FEED_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedItemKind {
    RecipeCreated,
    RecipeAddedToWeek,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeedItemKind,
    pub user: UserSummary,
    pub recipe: Recipe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_index: Option<DayIndex>,
    pub created_at: Timestamp,
}

/// A followed user putting a recipe on their week.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanActivity {
    pub owner: UserSummary,
    pub item: MealPlanItem,
}

impl From<Recipe> for FeedItem {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: format!("recipe-{}", recipe.id),
            kind: FeedItemKind::RecipeCreated,
            user: recipe.author.clone(),
            created_at: recipe.created_at,
            meal_type: None,
            day_index: None,
            recipe,
        }
    }
}

impl From<PlanActivity> for FeedItem {
    fn from(activity: PlanActivity) -> Self {
        let PlanActivity { owner, item } = activity;
        Self {
            id: format!("mealplan-{}", item.id),
            kind: FeedItemKind::RecipeAddedToWeek,
            user: owner,
            meal_type: Some(item.meal_type),
            day_index: Some(item.day_index),
            created_at: item.created_at,
            recipe: item.recipe,
        }
    }
}

/// Recipes first, then plan activity, stably sorted newest first and cut
/// to `limit`. Equal timestamps keep that concatenation order.
#[must_use]
pub fn merge_feed(recipes: Vec<Recipe>, activity: Vec<PlanActivity>, limit: usize) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = recipes
        .into_iter()
        .map(FeedItem::from)
        .chain(activity.into_iter().map(FeedItem::from))
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit);
    items
}
