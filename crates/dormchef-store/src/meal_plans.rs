// SPDX-License-Identifier: Apache-2.0

use crate::recipes::recipe_exists;
use crate::rows::{query_plan_items, timestamp, user_id};
use crate::StoreError;
use dormchef_model::{
    format_timestamp, now_utc, DayIndex, MealPlan, MealPlanId, MealPlanItem, MealPlanItemId,
    MealType, RecipeId, Servings, Timestamp, UserId, WeekOf,
};
use rusqlite::{params, types::Value, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMealPlanItem {
    pub recipe_id: RecipeId,
    pub day_index: DayIndex,
    pub meal_type: MealType,
    pub servings: Servings,
    pub week_of: WeekOf,
}

fn plan_header(
    conn: &Connection,
    user: &UserId,
    week: WeekOf,
) -> Result<Option<(MealPlanId, Timestamp)>, StoreError> {
    conn.query_row(
        "SELECT id, created_at FROM meal_plans WHERE user_id = ?1 AND week_of = ?2",
        params![user.as_str(), week.as_key()],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
    )
    .optional()?
    .map(|(id, created_at)| {
        Ok((
            MealPlanId::parse(&id).map_err(StoreError::corrupt)?,
            timestamp(&created_at)?,
        ))
    })
    .transpose()
}

fn ensure_plan(
    conn: &Connection,
    user: &UserId,
    week: WeekOf,
    now: Timestamp,
) -> Result<(MealPlanId, Timestamp), StoreError> {
    conn.execute(
        "INSERT INTO meal_plans (id, user_id, week_of, created_at) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT (user_id, week_of) DO NOTHING",
        params![
            MealPlanId::generate().as_str(),
            user.as_str(),
            week.as_key(),
            format_timestamp(&now)
        ],
    )?;
    plan_header(conn, user, week)?.ok_or(StoreError::NotFound("meal plan"))
}

fn plan_items(conn: &Connection, plan: &MealPlanId) -> Result<Vec<MealPlanItem>, StoreError> {
    Ok(query_plan_items(
        conn,
        "WHERE i.meal_plan_id = ? ORDER BY i.created_at, i.rowid",
        &[Value::Text(plan.to_string())],
    )?
    .into_iter()
    .map(|(_, item)| item)
    .collect())
}

/// The plan of `user` for `week` with every item and its full recipe, or
/// `None` when the week has never been planned.
pub fn find_meal_plan(
    conn: &Connection,
    user: &UserId,
    week: WeekOf,
) -> Result<Option<MealPlan>, StoreError> {
    let Some((id, created_at)) = plan_header(conn, user, week)? else {
        return Ok(None);
    };
    let items = plan_items(conn, &id)?;
    Ok(Some(MealPlan {
        id,
        user_id: user.clone(),
        week_of: week,
        created_at,
        items,
    }))
}

pub fn get_or_create_meal_plan(
    conn: &Connection,
    user: &UserId,
    week: WeekOf,
) -> Result<MealPlan, StoreError> {
    let (id, created_at) = ensure_plan(conn, user, week, now_utc())?;
    let items = plan_items(conn, &id)?;
    Ok(MealPlan {
        id,
        user_id: user.clone(),
        week_of: week,
        created_at,
        items,
    })
}

/// Puts a recipe on the user's week, creating the plan on first use.
pub fn add_meal_plan_item(
    conn: &mut Connection,
    user: &UserId,
    new: &NewMealPlanItem,
) -> Result<MealPlanItem, StoreError> {
    add_meal_plan_item_at(conn, user, new, now_utc())
}

pub(crate) fn add_meal_plan_item_at(
    conn: &mut Connection,
    user: &UserId,
    new: &NewMealPlanItem,
    created_at: Timestamp,
) -> Result<MealPlanItem, StoreError> {
    let id = MealPlanItemId::generate();
    let tx = conn.transaction()?;
    if !recipe_exists(&tx, &new.recipe_id)? {
        return Err(StoreError::NotFound("recipe"));
    }
    let (plan_id, _) = ensure_plan(&tx, user, new.week_of, created_at)?;
    tx.execute(
        "INSERT INTO meal_plan_items (id, meal_plan_id, recipe_id, day_index, meal_type, \
         servings, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.as_str(),
            plan_id.as_str(),
            new.recipe_id.as_str(),
            new.day_index.get(),
            new.meal_type.as_str(),
            new.servings.get(),
            format_timestamp(&created_at)
        ],
    )?;
    tx.commit()?;

    query_plan_items(conn, "WHERE i.id = ?", &[Value::Text(id.to_string())])?
        .pop()
        .map(|(_, item)| item)
        .ok_or(StoreError::NotFound("meal plan item"))
}

/// Owner of the plan the item belongs to.
pub fn meal_plan_item_owner(
    conn: &Connection,
    item: &MealPlanItemId,
) -> Result<Option<UserId>, StoreError> {
    conn.query_row(
        "SELECT p.user_id FROM meal_plan_items i JOIN meal_plans p ON p.id = i.meal_plan_id \
         WHERE i.id = ?1",
        params![item.as_str()],
        |row| row.get::<_, String>(0),
    )
    .optional()?
    .map(|raw| user_id(&raw))
    .transpose()
}

pub fn delete_meal_plan_item(conn: &Connection, item: &MealPlanItemId) -> Result<bool, StoreError> {
    Ok(conn.execute(
        "DELETE FROM meal_plan_items WHERE id = ?1",
        params![item.as_str()],
    )? > 0)
}
