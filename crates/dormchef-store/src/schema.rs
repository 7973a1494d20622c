// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use rusqlite::Connection;
use tracing::info;

pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE users (
  id TEXT PRIMARY KEY,
  name TEXT,
  email TEXT NOT NULL UNIQUE,
  password_hash TEXT NOT NULL,
  image TEXT,
  created_at TEXT NOT NULL
);
CREATE TABLE recipes (
  id TEXT PRIMARY KEY,
  title TEXT NOT NULL,
  hero_image TEXT,
  cook_time_min INTEGER NOT NULL,
  servings INTEGER NOT NULL,
  est_cost_total REAL NOT NULL,
  tags TEXT NOT NULL,
  steps TEXT NOT NULL,
  author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
CREATE INDEX recipes_created_idx ON recipes(created_at);
CREATE INDEX recipes_author_created_idx ON recipes(author_id, created_at);
CREATE TABLE ingredients (
  id TEXT PRIMARY KEY,
  recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  qty REAL NOT NULL,
  unit TEXT NOT NULL,
  approx_price REAL NOT NULL,
  position INTEGER NOT NULL
);
CREATE INDEX ingredients_recipe_idx ON ingredients(recipe_id, position);
CREATE TABLE follows (
  from_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
  to_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
  created_at TEXT NOT NULL,
  PRIMARY KEY (from_id, to_id)
) WITHOUT ROWID;
CREATE TABLE likes (
  user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
  recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
  created_at TEXT NOT NULL,
  PRIMARY KEY (user_id, recipe_id)
) WITHOUT ROWID;
CREATE INDEX likes_recipe_idx ON likes(recipe_id);
CREATE TABLE meal_plans (
  id TEXT PRIMARY KEY,
  user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
  week_of TEXT NOT NULL,
  created_at TEXT NOT NULL,
  UNIQUE (user_id, week_of)
);
CREATE TABLE meal_plan_items (
  id TEXT PRIMARY KEY,
  meal_plan_id TEXT NOT NULL REFERENCES meal_plans(id) ON DELETE CASCADE,
  recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
  day_index INTEGER NOT NULL CHECK (day_index BETWEEN 0 AND 6),
  meal_type TEXT NOT NULL,
  servings INTEGER NOT NULL CHECK (servings >= 1),
  created_at TEXT NOT NULL
);
CREATE INDEX meal_plan_items_plan_idx ON meal_plan_items(meal_plan_id);
CREATE INDEX meal_plan_items_created_idx ON meal_plan_items(created_at);
";

/// Per-connection settings; `foreign_keys` is off by default in SQLite.
pub fn configure_connection(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000; PRAGMA temp_store=MEMORY;",
    )?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Brings the schema up to [`SCHEMA_VERSION`]. Returns the version found
/// before migrating.
pub fn migrate(conn: &mut Connection) -> Result<i64, StoreError> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::Corrupt(format!(
            "database schema version {found} is newer than supported {SCHEMA_VERSION}"
        )));
    }
    if found == SCHEMA_VERSION {
        return Ok(found);
    }
    let tx = conn.transaction()?;
    if found < 1 {
        tx.execute_batch(SCHEMA_V1)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))?;
    tx.commit()?;
    info!(from = found, to = SCHEMA_VERSION, "database schema migrated");
    Ok(found)
}
