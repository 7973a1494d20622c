// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! SQLite persistence for DormChef.
//!
//! Repository functions are synchronous and take a `rusqlite::Connection`
//! so they can be driven from tests, the CLI and the server alike. The
//! server goes through [`Database`], which owns one connection behind a
//! mutex and runs every call on the blocking pool.

mod error;
mod feed;
mod meal_plans;
mod recipes;
mod rows;
mod schema;
mod seed;
mod social;
mod users;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub use error::StoreError;
pub use feed::{recent_plan_items_by_users, recent_recipes_by_authors};
pub use meal_plans::{
    add_meal_plan_item, delete_meal_plan_item, find_meal_plan, get_or_create_meal_plan,
    meal_plan_item_owner, NewMealPlanItem,
};
pub use recipes::{
    create_recipe, delete_recipe, get_recipe, list_recipes, recipe_author, recipe_exists,
    NewIngredient, NewRecipe, RecipeFilter,
};
pub use schema::{configure_connection, migrate, schema_version, SCHEMA_VERSION};
pub use seed::{seed_demo_data, SeedReport, DEMO_PASSWORD, DEMO_USERS};
pub use social::{create_follow, delete_follow, follow_exists, following_ids, toggle_like};
pub use users::{create_user, find_user, find_user_by_email, NewUser, UserCredentials};

pub const CRATE_NAME: &str = "dormchef-store";

/// Shared handle to the application database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Opens (creating if needed) the database file and migrates it.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(mut conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        configure_connection(&conn)?;
        migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.blocking_lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }

    /// Synchronous access for callers outside an async runtime (the CLI).
    /// Panics if called from within a runtime thread.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.conn.blocking_lock();
        f(&mut guard)
    }

    /// Round-trips a trivial query; backs the readiness probe.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.call(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
    }
}
