// SPDX-License-Identifier: Apache-2.0

use crate::error::is_unique_violation;
use crate::recipes::recipe_exists;
use crate::rows::user_id;
use crate::users::find_user;
use crate::StoreError;
use dormchef_model::{format_timestamp, now_utc, Follow, RecipeId, Timestamp, UserId};
use rusqlite::{params, Connection, OptionalExtension};

pub fn follow_exists(conn: &Connection, from: &UserId, to: &UserId) -> Result<bool, StoreError> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM follows WHERE from_id = ?1 AND to_id = ?2",
            params![from.as_str(), to.as_str()],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}

/// Records `from` following `to` and returns the edge with the followee's
/// public summary. Self-follows are rejected by the caller.
pub fn create_follow(conn: &Connection, from: &UserId, to: &UserId) -> Result<Follow, StoreError> {
    create_follow_at(conn, from, to, now_utc())
}

pub(crate) fn create_follow_at(
    conn: &Connection,
    from: &UserId,
    to: &UserId,
    created_at: Timestamp,
) -> Result<Follow, StoreError> {
    let followee = find_user(conn, to)?.ok_or(StoreError::NotFound("user"))?;
    conn.execute(
        "INSERT INTO follows (from_id, to_id, created_at) VALUES (?1, ?2, ?3)",
        params![from.as_str(), to.as_str(), format_timestamp(&created_at)],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::Conflict("Already following user".to_string())
        } else {
            StoreError::Sqlite(e)
        }
    })?;
    Ok(Follow {
        from_id: from.clone(),
        to_id: to.clone(),
        created_at,
        to: followee.summary(),
    })
}

/// Returns whether an edge was removed.
pub fn delete_follow(conn: &Connection, from: &UserId, to: &UserId) -> Result<bool, StoreError> {
    Ok(conn.execute(
        "DELETE FROM follows WHERE from_id = ?1 AND to_id = ?2",
        params![from.as_str(), to.as_str()],
    )? > 0)
}

pub fn following_ids(conn: &Connection, from: &UserId) -> Result<Vec<UserId>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT to_id FROM follows WHERE from_id = ?1 ORDER BY created_at, to_id")?;
    let raw = stmt
        .query_map(params![from.as_str()], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    raw.iter().map(|id| user_id(id)).collect()
}

/// Flips the like of `user` on `recipe`; returns the new state.
pub fn toggle_like(
    conn: &mut Connection,
    user: &UserId,
    recipe: &RecipeId,
) -> Result<bool, StoreError> {
    let tx = conn.transaction()?;
    if !recipe_exists(&tx, recipe)? {
        return Err(StoreError::NotFound("recipe"));
    }
    let removed = tx.execute(
        "DELETE FROM likes WHERE user_id = ?1 AND recipe_id = ?2",
        params![user.as_str(), recipe.as_str()],
    )?;
    let liked = if removed > 0 {
        false
    } else {
        tx.execute(
            "INSERT INTO likes (user_id, recipe_id, created_at) VALUES (?1, ?2, ?3)",
            params![user.as_str(), recipe.as_str(), format_timestamp(&now_utc())],
        )?;
        true
    };
    tx.commit()?;
    Ok(liked)
}
