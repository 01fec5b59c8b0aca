// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite via sqlx).
//!
//! Operations are grouped by area:
//! - Users (accounts, avatars)
//! - Catalog (tags, ingredients)
//! - Recipes (with tag links and ingredient amounts)
//! - Community (follows, favorites, shopping cart, shopping list)
//! - Short links

mod catalog;
mod community;
mod recipes;
mod short_links;
mod users;

pub use community::RecipeList;

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Pool size for file-backed databases.
const MAX_CONNECTIONS: u32 = 8;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const TAGS: &str = "tags";
    pub const INGREDIENTS: &str = "ingredients";
    pub const RECIPES: &str = "recipes";
    pub const RECIPE_TAGS: &str = "recipe_tags";
    pub const RECIPE_INGREDIENTS: &str = "recipe_ingredients";
    pub const FOLLOWS: &str = "follows";
    pub const FAVORITES: &str = "favorites";
    pub const SHOPPING_CART: &str = "shopping_cart";
    pub const SHORT_LINKS: &str = "short_links";
}

/// SQLite database handle. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations.
    ///
    /// The database file is created if it does not exist. In-memory databases
    /// are pinned to a single long-lived connection, since every SQLite
    /// connection to `:memory:` opens a separate database.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        tracing::info!(url = database_url, in_memory, "Connected to SQLite");

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the pool for ad-hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables and indexes. Idempotent.
    pub async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        }
        tracing::debug!(statements = SCHEMA.len(), "Database schema up to date");
        Ok(())
    }
}

/// Shorthand for wrapping plain sqlx failures.
pub(crate) fn db_error(err: sqlx::Error) -> AppError {
    AppError::Database(err.to_string())
}

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        avatar TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        name_lower TEXT NOT NULL,
        measurement_unit TEXT NOT NULL,
        UNIQUE (name, measurement_unit)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        text TEXT NOT NULL,
        image TEXT NOT NULL,
        cooking_time INTEGER NOT NULL CHECK (cooking_time BETWEEN 1 AND 32000),
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_tags (
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (recipe_id, tag_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
        amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 32000),
        UNIQUE (recipe_id, ingredient_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS follows (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (user_id, author_id),
        CHECK (user_id <> author_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS favorites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        UNIQUE (user_id, recipe_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS shopping_cart (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        UNIQUE (user_id, recipe_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS short_links (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL UNIQUE REFERENCES recipes(id) ON DELETE CASCADE,
        full_url TEXT NOT NULL UNIQUE,
        short_code TEXT NOT NULL UNIQUE
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_created ON recipes(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient ON recipe_ingredients(ingredient_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag_id)",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_name_lower ON ingredients(name_lower)",
    "CREATE INDEX IF NOT EXISTS idx_follows_author ON follows(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_shopping_cart_recipe ON shopping_cart(recipe_id)",
];
