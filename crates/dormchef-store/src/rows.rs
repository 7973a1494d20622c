// SPDX-License-Identifier: Apache-2.0

//! Raw row shapes and their conversion into domain records.
//!
//! Rows are read with plain `row.get` into owned strings first; turning
//! them into validated ids, timestamps and JSON arrays happens afterwards
//! so a bad stored value surfaces as [`StoreError::Corrupt`] rather than a
//! rusqlite conversion error.

use crate::StoreError;
use dormchef_model::{
    parse_timestamp, DayIndex, Ingredient, IngredientId, MealPlanId, MealPlanItem,
    MealPlanItemId, MealType, Recipe, RecipeCounts, RecipeId, Servings, Timestamp, UserId,
    UserSummary,
};
use rusqlite::{params_from_iter, types::Value, Connection};
use std::collections::HashMap;

pub(crate) const RECIPE_COLUMNS: &str = "r.id, r.title, r.hero_image, r.cook_time_min, \
     r.servings, r.est_cost_total, r.tags, r.steps, r.author_id, r.created_at, r.updated_at, \
     u.name, u.image, (SELECT COUNT(*) FROM likes l WHERE l.recipe_id = r.id)";

pub(crate) const RECIPE_FROM: &str = "FROM recipes r JOIN users u ON u.id = r.author_id";

pub(crate) fn user_id(raw: &str) -> Result<UserId, StoreError> {
    UserId::parse(raw).map_err(StoreError::corrupt)
}

pub(crate) fn recipe_id(raw: &str) -> Result<RecipeId, StoreError> {
    RecipeId::parse(raw).map_err(StoreError::corrupt)
}

pub(crate) fn timestamp(raw: &str) -> Result<Timestamp, StoreError> {
    parse_timestamp(raw).map_err(|e| StoreError::Corrupt(format!("timestamp {raw:?}: {e}")))
}

fn string_array(column: &str, raw: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(raw)
        .map_err(|e| StoreError::Corrupt(format!("{column} is not a JSON string array: {e}")))
}

fn non_negative_u32(column: &str, raw: i64) -> Result<u32, StoreError> {
    u32::try_from(raw).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {raw}")))
}

#[derive(Debug, Clone)]
pub(crate) struct RawRecipeRow {
    id: String,
    title: String,
    hero_image: Option<String>,
    cook_time_min: i64,
    servings: i64,
    est_cost_total: f64,
    tags: String,
    steps: String,
    author_id: String,
    created_at: String,
    updated_at: String,
    author_name: Option<String>,
    author_image: Option<String>,
    likes: i64,
}

impl RawRecipeRow {
    pub(crate) fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            hero_image: row.get(2)?,
            cook_time_min: row.get(3)?,
            servings: row.get(4)?,
            est_cost_total: row.get(5)?,
            tags: row.get(6)?,
            steps: row.get(7)?,
            author_id: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
            author_name: row.get(11)?,
            author_image: row.get(12)?,
            likes: row.get(13)?,
        })
    }

    fn into_recipe(self, ingredients: Vec<Ingredient>) -> Result<Recipe, StoreError> {
        let author_id = user_id(&self.author_id)?;
        Ok(Recipe {
            id: recipe_id(&self.id)?,
            title: self.title,
            hero_image: self.hero_image,
            cook_time_min: non_negative_u32("cook_time_min", self.cook_time_min)?,
            servings: non_negative_u32("servings", self.servings)?,
            est_cost_total: self.est_cost_total,
            tags: string_array("tags", &self.tags)?,
            steps: string_array("steps", &self.steps)?,
            created_at: timestamp(&self.created_at)?,
            updated_at: timestamp(&self.updated_at)?,
            author: UserSummary {
                id: author_id.clone(),
                name: self.author_name,
                image: self.author_image,
            },
            author_id,
            ingredients,
            counts: RecipeCounts {
                likes: u64::try_from(self.likes).unwrap_or(0),
            },
            is_liked: None,
        })
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Ingredients for every recipe in `ids`, each list in insertion order.
pub(crate) fn load_ingredients(
    conn: &Connection,
    ids: &[String],
) -> Result<HashMap<String, Vec<Ingredient>>, StoreError> {
    let mut out: HashMap<String, Vec<Ingredient>> = HashMap::new();
    if ids.is_empty() {
        return Ok(out);
    }
    let sql = format!(
        "SELECT id, recipe_id, name, qty, unit, approx_price FROM ingredients \
         WHERE recipe_id IN ({}) ORDER BY recipe_id, position",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    for (id, owner, name, qty, unit, approx_price) in rows {
        let ingredient = Ingredient {
            id: IngredientId::parse(&id).map_err(StoreError::corrupt)?,
            recipe_id: recipe_id(&owner)?,
            name,
            qty,
            unit,
            approx_price,
        };
        out.entry(owner).or_default().push(ingredient);
    }
    Ok(out)
}

/// Runs a recipe query built from [`RECIPE_COLUMNS`] and [`RECIPE_FROM`]
/// plus `tail` (WHERE/ORDER/LIMIT), then attaches ingredients.
pub(crate) fn query_recipes(
    conn: &Connection,
    tail: &str,
    params: &[Value],
) -> Result<Vec<Recipe>, StoreError> {
    let sql = format!("SELECT {RECIPE_COLUMNS} {RECIPE_FROM} {tail}");
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
        .query_map(params_from_iter(params.iter()), RawRecipeRow::from_sql_row)?
        .collect::<Result<Vec<_>, _>>()?;
    let ids: Vec<String> = raws.iter().map(|r| r.id.clone()).collect();
    let mut ingredients = load_ingredients(conn, &ids)?;
    raws.into_iter()
        .map(|raw| {
            let list = ingredients.remove(&raw.id).unwrap_or_default();
            raw.into_recipe(list)
        })
        .collect()
}

/// Recipes keyed by id; ids that do not exist are simply absent.
pub(crate) fn recipes_by_id(
    conn: &Connection,
    ids: &[String],
) -> Result<HashMap<RecipeId, Recipe>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let tail = format!("WHERE r.id IN ({})", placeholders(ids.len()));
    let params: Vec<Value> = ids.iter().map(|id| Value::Text(id.clone())).collect();
    Ok(query_recipes(conn, &tail, &params)?
        .into_iter()
        .map(|recipe| (recipe.id.clone(), recipe))
        .collect())
}

pub(crate) const PLAN_ITEM_COLUMNS: &str = "i.id, i.meal_plan_id, i.recipe_id, i.day_index, \
     i.meal_type, i.servings, i.created_at, p.user_id, u.name, u.image";

pub(crate) const PLAN_ITEM_FROM: &str = "FROM meal_plan_items i \
     JOIN meal_plans p ON p.id = i.meal_plan_id JOIN users u ON u.id = p.user_id";

#[derive(Debug, Clone)]
pub(crate) struct RawPlanItemRow {
    id: String,
    meal_plan_id: String,
    recipe_id: String,
    day_index: i64,
    meal_type: String,
    servings: i64,
    created_at: String,
    owner_id: String,
    owner_name: Option<String>,
    owner_image: Option<String>,
}

impl RawPlanItemRow {
    pub(crate) fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            meal_plan_id: row.get(1)?,
            recipe_id: row.get(2)?,
            day_index: row.get(3)?,
            meal_type: row.get(4)?,
            servings: row.get(5)?,
            created_at: row.get(6)?,
            owner_id: row.get(7)?,
            owner_name: row.get(8)?,
            owner_image: row.get(9)?,
        })
    }
}

/// Runs a plan item query built from [`PLAN_ITEM_COLUMNS`] and
/// [`PLAN_ITEM_FROM`] plus `tail`, returning each item with its plan owner.
pub(crate) fn query_plan_items(
    conn: &Connection,
    tail: &str,
    params: &[Value],
) -> Result<Vec<(UserSummary, MealPlanItem)>, StoreError> {
    let sql = format!("SELECT {PLAN_ITEM_COLUMNS} {PLAN_ITEM_FROM} {tail}");
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
        .query_map(params_from_iter(params.iter()), RawPlanItemRow::from_sql_row)?
        .collect::<Result<Vec<_>, _>>()?;
    let mut recipe_ids: Vec<String> = raws.iter().map(|r| r.recipe_id.clone()).collect();
    recipe_ids.sort();
    recipe_ids.dedup();
    let recipes = recipes_by_id(conn, &recipe_ids)?;

    raws.into_iter()
        .map(|raw| {
            let planned = recipe_id(&raw.recipe_id)?;
            let recipe = recipes
                .get(&planned)
                .cloned()
                .ok_or_else(|| StoreError::Corrupt(format!("plan item {} has no recipe", raw.id)))?;
            let owner = UserSummary {
                id: user_id(&raw.owner_id)?,
                name: raw.owner_name,
                image: raw.owner_image,
            };
            let item = MealPlanItem {
                id: MealPlanItemId::parse(&raw.id).map_err(StoreError::corrupt)?,
                meal_plan_id: MealPlanId::parse(&raw.meal_plan_id).map_err(StoreError::corrupt)?,
                recipe_id: planned,
                day_index: DayIndex::new(raw.day_index).map_err(StoreError::corrupt)?,
                meal_type: raw
                    .meal_type
                    .parse::<MealType>()
                    .map_err(StoreError::corrupt)?,
                servings: Servings::new(raw.servings).map_err(StoreError::corrupt)?,
                created_at: timestamp(&raw.created_at)?,
                recipe,
            };
            Ok((owner, item))
        })
        .collect()
}

/// `LIKE` pattern matching `needle` anywhere, escaped with `!`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '!' | '%' | '_') {
            out.push('!');
        }
        out.push(c);
    }
    out.push('%');
    out
}
