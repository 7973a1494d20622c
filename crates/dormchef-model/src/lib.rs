// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]
//! DormChef domain model.
//!
//! Identifiers, validated value types and week arithmetic shared by the
//! store, planner, api and server crates.

mod ids;
mod plan;
mod records;
mod time;

pub use ids::{
    IngredientId, MealPlanId, MealPlanItemId, RecipeId, UserId, ValidationError, ID_MAX_LEN,
};
pub use plan::{week_start, DayIndex, MealType, Servings, WeekOf, DAYS_PER_WEEK};
pub use records::{
    Follow, Ingredient, MealPlan, MealPlanItem, Recipe, RecipeCounts, User, UserSummary,
};
pub use time::{format_timestamp, now_utc, parse_timestamp, Timestamp};

pub const CRATE_NAME: &str = "dormchef-model";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::DependencyFailure => "dependency_failure",
            Self::Internal => "internal",
        }
    }
}
