// SPDX-License-Identifier: Apache-2.0

use crate::rows::{contains_pattern, query_recipes, user_id};
use crate::StoreError;
use dormchef_model::{format_timestamp, now_utc, IngredientId, Recipe, RecipeId, Timestamp, UserId};
use rusqlite::{params, types::Value, Connection, OptionalExtension};

/// Optional narrowing for [`list_recipes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Substring of the stored tags JSON.
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient {
    pub name: String,
    pub qty: f64,
    pub unit: String,
    pub approx_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub hero_image: Option<String>,
    pub cook_time_min: u32,
    pub servings: u32,
    pub tags: Vec<String>,
    pub steps: Vec<String>,
    pub ingredients: Vec<NewIngredient>,
}

impl NewRecipe {
    /// Sum of ingredient prices as listed, not multiplied by quantity.
    #[must_use]
    pub fn est_cost_total(&self) -> f64 {
        self.ingredients.iter().map(|i| i.approx_price).sum()
    }
}

/// Newest first. The title match folds case with Unicode rules, so it
/// runs over the decoded rows; SQLite's `lower()` only folds ASCII.
pub fn list_recipes(conn: &Connection, filter: &RecipeFilter) -> Result<Vec<Recipe>, StoreError> {
    let mut tail = String::new();
    let mut params: Vec<Value> = Vec::new();
    if let Some(tag) = filter.tag.as_deref().filter(|s| !s.is_empty()) {
        tail.push_str("WHERE r.tags LIKE ? ESCAPE '!'");
        params.push(Value::Text(contains_pattern(tag)));
    }
    tail.push_str(" ORDER BY r.created_at DESC, r.rowid DESC");
    let mut recipes = query_recipes(conn, &tail, &params)?;
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        recipes.retain(|r| r.title.to_lowercase().contains(&needle));
    }
    Ok(recipes)
}

/// One recipe with its like count; `isLiked` is filled in when a viewer
/// is given.
pub fn get_recipe(
    conn: &Connection,
    id: &RecipeId,
    viewer: Option<&UserId>,
) -> Result<Option<Recipe>, StoreError> {
    let mut found = query_recipes(conn, "WHERE r.id = ?", &[Value::Text(id.to_string())])?;
    let Some(mut recipe) = found.pop() else {
        return Ok(None);
    };
    if let Some(viewer) = viewer {
        let liked = conn
            .query_row(
                "SELECT 1 FROM likes WHERE user_id = ?1 AND recipe_id = ?2",
                params![viewer.as_str(), id.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        recipe.is_liked = Some(liked);
    }
    Ok(Some(recipe))
}

pub fn create_recipe(
    conn: &mut Connection,
    author: &UserId,
    new: &NewRecipe,
) -> Result<Recipe, StoreError> {
    create_recipe_at(conn, author, new, now_utc())
}

pub(crate) fn create_recipe_at(
    conn: &mut Connection,
    author: &UserId,
    new: &NewRecipe,
    created_at: Timestamp,
) -> Result<Recipe, StoreError> {
    let id = RecipeId::generate();
    let stamp = format_timestamp(&created_at);
    let tags = serde_json::to_string(&new.tags).map_err(StoreError::corrupt)?;
    let steps = serde_json::to_string(&new.steps).map_err(StoreError::corrupt)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO recipes (id, title, hero_image, cook_time_min, servings, est_cost_total, \
         tags, steps, author_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            id.as_str(),
            new.title,
            new.hero_image,
            new.cook_time_min,
            new.servings,
            new.est_cost_total(),
            tags,
            steps,
            author.as_str(),
            stamp
        ],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO ingredients (id, recipe_id, name, qty, unit, approx_price, position) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, ingredient) in new.ingredients.iter().enumerate() {
            stmt.execute(params![
                IngredientId::generate().as_str(),
                id.as_str(),
                ingredient.name,
                ingredient.qty,
                ingredient.unit,
                ingredient.approx_price,
                position as i64
            ])?;
        }
    }
    tx.commit()?;

    get_recipe(conn, &id, None)?.ok_or(StoreError::NotFound("recipe"))
}

pub fn recipe_exists(conn: &Connection, id: &RecipeId) -> Result<bool, StoreError> {
    Ok(recipe_author(conn, id)?.is_some())
}

pub fn recipe_author(conn: &Connection, id: &RecipeId) -> Result<Option<UserId>, StoreError> {
    conn.query_row(
        "SELECT author_id FROM recipes WHERE id = ?1",
        params![id.as_str()],
        |row| row.get::<_, String>(0),
    )
    .optional()?
    .map(|raw| user_id(&raw))
    .transpose()
}

/// Removes the recipe; ingredients, likes and plan items go with it.
pub fn delete_recipe(conn: &Connection, id: &RecipeId) -> Result<bool, StoreError> {
    Ok(conn.execute("DELETE FROM recipes WHERE id = ?1", params![id.as_str()])? > 0)
}
