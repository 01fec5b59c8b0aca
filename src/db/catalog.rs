// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tag and ingredient catalog operations.

use super::{db_error, Database};
use crate::error::AppError;
use crate::models::{Ingredient, NewIngredient, NewTag, Tag};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashSet;

impl Database {
    // ─── Tags ────────────────────────────────────────────────────

    /// All tags ordered by name.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }

    pub async fn get_tag(&self, tag_id: i64) -> Result<Option<Tag>, AppError> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    /// Insert tags, skipping any whose name or slug already exists.
    /// Returns the number of rows actually inserted.
    pub async fn insert_tags(&self, tags: &[NewTag]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let mut inserted = 0;
        for tag in tags {
            inserted += sqlx::query("INSERT OR IGNORE INTO tags (name, slug) VALUES (?, ?)")
                .bind(tag.name.trim())
                .bind(tag.slug.trim())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();
        }
        tx.commit().await.map_err(db_error)?;
        Ok(inserted)
    }

    /// Which of `ids` exist in the tags table.
    pub async fn existing_tag_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, AppError> {
        self.existing_ids("tags", ids).await
    }

    // ─── Ingredients ─────────────────────────────────────────────

    /// Ingredients ordered by name, optionally filtered by a case-insensitive
    /// substring of the name. Names starting with the filter come first.
    pub async fn list_ingredients(&self, name: Option<&str>) -> Result<Vec<Ingredient>, AppError> {
        let needle = name.map(|n| n.trim().to_lowercase()).filter(|n| !n.is_empty());

        match needle {
            None => sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(db_error),
            Some(needle) => {
                let escaped = escape_like(&needle);
                sqlx::query_as::<_, Ingredient>(
                    r"
                    SELECT id, name, measurement_unit FROM ingredients
                    WHERE name_lower LIKE ? ESCAPE '\'
                    ORDER BY (name_lower LIKE ? ESCAPE '\') DESC, name, measurement_unit
                    ",
                )
                .bind(format!("%{escaped}%"))
                .bind(format!("{escaped}%"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)
            }
        }
    }

    pub async fn get_ingredient(&self, ingredient_id: i64) -> Result<Option<Ingredient>, AppError> {
        sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?",
        )
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Insert ingredients, skipping existing (name, unit) pairs.
    /// Returns the number of rows actually inserted.
    pub async fn insert_ingredients(&self, ingredients: &[NewIngredient]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let mut inserted = 0;
        for ingredient in ingredients {
            let name = ingredient.name.trim();
            inserted += sqlx::query(
                "INSERT OR IGNORE INTO ingredients (name, name_lower, measurement_unit) VALUES (?, ?, ?)",
            )
            .bind(name)
            .bind(name.to_lowercase())
            .bind(ingredient.measurement_unit.trim())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();
        }
        tx.commit().await.map_err(db_error)?;
        Ok(inserted)
    }

    /// Which of `ids` exist in the ingredients table.
    pub async fn existing_ingredient_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, AppError> {
        self.existing_ids("ingredients", ids).await
    }

    async fn existing_ids(&self, table: &str, ids: &[i64]) -> Result<HashSet<i64>, AppError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<(i64,)> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

/// Escape `%`, `_` and `\` for a LIKE pattern using `\` as the escape character.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
