// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Follows, favorites, shopping cart and the aggregated shopping list.

use super::{db_error, tables, Database};
use crate::error::AppError;
use crate::models::{ShoppingListItem, User};

/// Per-user recipe bookmark relations. Both share the same shape: a unique
/// (user, recipe) edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    fn table(self) -> &'static str {
        match self {
            RecipeList::Favorites => tables::FAVORITES,
            RecipeList::ShoppingCart => tables::SHOPPING_CART,
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            RecipeList::Favorites => "favorites",
            RecipeList::ShoppingCart => "shopping cart",
        }
    }
}

impl Database {
    // ─── Follows ─────────────────────────────────────────────────

    /// Subscribe `user_id` to `author_id`.
    pub async fn add_follow(&self, user_id: i64, author_id: i64) -> Result<(), AppError> {
        if user_id == author_id {
            return Err(AppError::BadRequest(
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        sqlx::query("INSERT INTO follows (user_id, author_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_db_conflict(e, "Already subscribed to this author"))?;

        tracing::debug!(user_id, author_id, "Follow added");
        Ok(())
    }

    /// Remove a subscription. Returns whether one existed.
    pub async fn remove_follow(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let (exists,): (i64,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists != 0)
    }

    /// Authors `user_id` follows, ordered by username.
    pub async fn followed_authors(
        &self,
        user_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.avatar, u.created_at
            FROM users u
            JOIN follows f ON f.author_id = u.id
            WHERE f.user_id = ?
            ORDER BY u.username
            LIMIT ? OFFSET ?
            ",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn count_followed_authors(&self, user_id: i64) -> Result<u64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count as u64)
    }

    // ─── Favorites / Shopping cart ───────────────────────────────

    /// Add a recipe to one of the user's lists.
    pub async fn add_to_list(
        &self,
        list: RecipeList,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES (?, ?)",
            list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_db_conflict(e, &format!("Recipe is already in {}", list.label()))
        })?;

        tracing::debug!(user_id, recipe_id, list = list.label(), "Recipe added to list");
        Ok(())
    }

    /// Remove a recipe from one of the user's lists. Returns whether it was there.
    pub async fn remove_from_list(
        &self,
        list: RecipeList,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
            list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_contains(
        &self,
        list: RecipeList,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, AppError> {
        let (exists,): (i64,) = sqlx::query_as(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = ? AND recipe_id = ?)",
            list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists != 0)
    }

    // ─── Shopping list ───────────────────────────────────────────

    /// Sum ingredient amounts across every recipe in the user's cart, one row
    /// per ingredient, ordered by ingredient name.
    pub async fn shopping_list(&self, user_id: i64) -> Result<Vec<ShoppingListItem>, AppError> {
        sqlx::query_as::<_, ShoppingListItem>(
            r"
            SELECT i.name AS name,
                   i.measurement_unit AS measurement_unit,
                   SUM(ri.amount) AS total_amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = ?
            GROUP BY i.id, i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }
}
