// SPDX-License-Identifier: Apache-2.0

//! Request and response bodies.
//!
//! Request types deserialize leniently (plain integers, floats and strings)
//! and are checked by `validate`, which reports every offending field at
//! once in `details.field_errors`.

use crate::ApiError;
use dormchef_model::{
    DayIndex, MealType, RecipeId, Servings, User, UserId, WeekOf,
};
use dormchef_store::{NewIngredient, NewMealPlanItem, NewRecipe};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const PASSWORD_MIN_LEN: usize = 8;

/// Accumulates `{field, reason, message}` entries.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<Value>);

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, reason: &str, message: impl Into<String>) {
        self.0.push(json!({
            "field": field.into(),
            "reason": reason,
            "message": message.into(),
        }));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_failed(Value::Array(self.0)))
        }
    }
}

fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, "required", message);
    }
}

/// At least 1 and representable as `u32`; anything else is a field error.
fn positive_u32(errors: &mut FieldErrors, field: &str, value: i64) -> Option<u32> {
    if value < 1 {
        errors.push(field, "too_small", format!("{field} must be at least 1"));
        return None;
    }
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(
                field,
                "too_large",
                format!("{field} must be at most {}", u32::MAX),
            );
            None
        }
    }
}

/// `http://` or `https://` followed by a non-empty host, no whitespace.
#[must_use]
pub fn is_http_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !raw.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// `local@domain.tld` with no whitespace and non-empty labels.
#[must_use]
pub fn is_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registration input after trimming; the email is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<ValidRegistration, ApiError> {
        let mut errors = FieldErrors::default();
        require_text(&mut errors, "name", &self.name, "Name is required");
        let email = self.email.trim().to_lowercase();
        if !is_email(&email) {
            errors.push("email", "invalid", "Invalid email");
        }
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            errors.push(
                "password",
                "too_short",
                format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
            );
        }
        errors.finish()?;
        Ok(ValidRegistration {
            name: self.name.trim().to_string(),
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Returns the normalised email alongside the password.
    pub fn validate(self) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::default();
        require_text(&mut errors, "email", &self.email, "Email is required");
        if self.password.is_empty() {
            errors.push("password", "required", "Password is required");
        }
        errors.finish()?;
        Ok((self.email.trim().to_lowercase(), self.password))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    pub name: String,
    pub qty: f64,
    pub unit: String,
    pub approx_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub hero_image: Option<String>,
    pub cook_time_min: i64,
    pub servings: i64,
    pub tags: Vec<String>,
    pub steps: Vec<String>,
    pub ingredients: Vec<IngredientInput>,
}

impl CreateRecipeRequest {
    pub fn validate(self) -> Result<NewRecipe, ApiError> {
        let mut errors = FieldErrors::default();
        require_text(&mut errors, "title", &self.title, "Title is required");
        if let Some(url) = &self.hero_image {
            if !is_http_url(url) {
                errors.push("heroImage", "invalid", "heroImage must be an http(s) URL");
            }
        }
        let cook_time_min = positive_u32(&mut errors, "cookTimeMin", self.cook_time_min);
        let servings = positive_u32(&mut errors, "servings", self.servings);
        for (idx, step) in self.steps.iter().enumerate() {
            if step.is_empty() {
                errors.push(format!("steps[{idx}]"), "required", "Steps must not be empty");
            }
        }
        for (idx, ing) in self.ingredients.iter().enumerate() {
            if ing.name.is_empty() {
                errors.push(
                    format!("ingredients[{idx}].name"),
                    "required",
                    "Ingredient name is required",
                );
            }
            if !(ing.qty >= 0.0 && ing.qty.is_finite()) {
                errors.push(
                    format!("ingredients[{idx}].qty"),
                    "too_small",
                    "qty must be at least 0",
                );
            }
            if ing.unit.is_empty() {
                errors.push(
                    format!("ingredients[{idx}].unit"),
                    "required",
                    "Ingredient unit is required",
                );
            }
            if !(ing.approx_price >= 0.0 && ing.approx_price.is_finite()) {
                errors.push(
                    format!("ingredients[{idx}].approxPrice"),
                    "too_small",
                    "approxPrice must be at least 0",
                );
            }
        }
        errors.finish()?;
        let (Some(cook_time_min), Some(servings)) = (cook_time_min, servings) else {
            return Err(ApiError::validation_failed(json!([])));
        };

        Ok(NewRecipe {
            title: self.title,
            hero_image: self.hero_image,
            cook_time_min,
            servings,
            tags: self.tags,
            steps: self.steps,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| NewIngredient {
                    name: i.name,
                    qty: i.qty,
                    unit: i.unit,
                    approx_price: i.approx_price,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealPlanItemRequest {
    pub recipe_id: String,
    pub day_index: i64,
    pub meal_type: String,
    #[serde(default = "default_servings")]
    pub servings: i64,
    pub week_of: String,
}

fn default_servings() -> i64 {
    1
}

impl AddMealPlanItemRequest {
    pub fn validate(self) -> Result<NewMealPlanItem, ApiError> {
        let mut errors = FieldErrors::default();
        let recipe_id = RecipeId::parse(&self.recipe_id)
            .map_err(|e| errors.push("recipeId", "invalid", e.0))
            .ok();
        let day_index = DayIndex::new(self.day_index)
            .map_err(|e| errors.push("dayIndex", "out_of_range", e.0))
            .ok();
        let meal_type = self
            .meal_type
            .parse::<MealType>()
            .map_err(|e| errors.push("mealType", "invalid", e.0))
            .ok();
        let servings = Servings::new(self.servings)
            .map_err(|e| errors.push("servings", "too_small", e.0))
            .ok();
        let week_of = WeekOf::parse(&self.week_of)
            .map_err(|e| errors.push("weekOf", "invalid", e.0))
            .ok();
        errors.finish()?;
        match (recipe_id, day_index, meal_type, servings, week_of) {
            (Some(recipe_id), Some(day_index), Some(meal_type), Some(servings), Some(week_of)) => {
                Ok(NewMealPlanItem {
                    recipe_id,
                    day_index,
                    meal_type,
                    servings,
                    week_of,
                })
            }
            _ => Err(ApiError::validation_failed(json!([]))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

impl FollowRequest {
    pub fn validate(self) -> Result<UserId, ApiError> {
        UserId::parse(&self.user_id).map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.push("userId", "invalid", e.0);
            ApiError::validation_failed(Value::Array(errors.0))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub recipe_id: String,
}

impl LikeRequest {
    pub fn validate(self) -> Result<RecipeId, ApiError> {
        RecipeId::parse(&self.recipe_id).map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.push("recipeId", "invalid", e.0);
            ApiError::validation_failed(Value::Array(errors.0))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryRequest {
    pub week_of: String,
}

impl GroceryRequest {
    pub fn validate(self) -> Result<WeekOf, ApiError> {
        WeekOf::parse(&self.week_of).map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.push("weekOf", "invalid", e.0);
            ApiError::validation_failed(Value::Array(errors.0))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub schema_version: i64,
}
