// SPDX-License-Identifier: Apache-2.0

use crate::rows::{query_plan_items, query_recipes};
use crate::StoreError;
use dormchef_model::{Recipe, UserId};
use dormchef_planner::PlanActivity;
use rusqlite::{types::Value, Connection};

fn id_params(ids: &[UserId], limit: usize) -> (String, Vec<Value>) {
    let marks = vec!["?"; ids.len()].join(", ");
    let mut params: Vec<Value> = ids.iter().map(|id| Value::Text(id.to_string())).collect();
    params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    (marks, params)
}

/// Newest recipes written by any of `authors`.
pub fn recent_recipes_by_authors(
    conn: &Connection,
    authors: &[UserId],
    limit: usize,
) -> Result<Vec<Recipe>, StoreError> {
    if authors.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }
    let (marks, params) = id_params(authors, limit);
    query_recipes(
        conn,
        &format!("WHERE r.author_id IN ({marks}) ORDER BY r.created_at DESC, r.rowid DESC LIMIT ?"),
        &params,
    )
}

/// Newest plan additions made by any of `owners`, ordered by when each
/// item was added.
pub fn recent_plan_items_by_users(
    conn: &Connection,
    owners: &[UserId],
    limit: usize,
) -> Result<Vec<PlanActivity>, StoreError> {
    if owners.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }
    let (marks, params) = id_params(owners, limit);
    Ok(query_plan_items(
        conn,
        &format!("WHERE p.user_id IN ({marks}) ORDER BY i.created_at DESC, i.rowid DESC LIMIT ?"),
        &params,
    )?
    .into_iter()
    .map(|(owner, item)| PlanActivity { owner, item })
    .collect())
}
