// SPDX-License-Identifier: Apache-2.0

use crate::ids::{IngredientId, MealPlanId, MealPlanItemId, RecipeId, UserId};
use crate::plan::{DayIndex, MealType, Servings, WeekOf};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Public face of a user embedded in recipes, follows and feed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Account record; the password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub created_at: Timestamp,
}

impl User {
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub recipe_id: RecipeId,
    pub name: String,
    pub qty: f64,
    pub unit: String,
    pub approx_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecipeCounts {
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub hero_image: Option<String>,
    pub cook_time_min: u32,
    pub servings: u32,
    pub est_cost_total: f64,
    pub tags: Vec<String>,
    pub steps: Vec<String>,
    pub author_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub author: UserSummary,
    pub ingredients: Vec<Ingredient>,
    #[serde(rename = "_count")]
    pub counts: RecipeCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanItem {
    pub id: MealPlanItemId,
    pub meal_plan_id: MealPlanId,
    pub recipe_id: RecipeId,
    pub day_index: DayIndex,
    pub meal_type: MealType,
    pub servings: Servings,
    pub created_at: Timestamp,
    pub recipe: Recipe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: MealPlanId,
    pub user_id: UserId,
    pub week_of: WeekOf,
    pub created_at: Timestamp,
    pub items: Vec<MealPlanItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub from_id: UserId,
    pub to_id: UserId,
    pub created_at: Timestamp,
    pub to: UserSummary,
}
