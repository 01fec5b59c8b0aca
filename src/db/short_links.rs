// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short link storage.

use super::{db_error, Database};
use crate::error::AppError;
use crate::models::ShortLink;

impl Database {
    pub async fn short_link_for_recipe(&self, recipe_id: i64) -> Result<Option<ShortLink>, AppError> {
        sqlx::query_as::<_, ShortLink>(
            "SELECT recipe_id, full_url, short_code FROM short_links WHERE recipe_id = ?",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn short_link_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        sqlx::query_as::<_, ShortLink>(
            "SELECT recipe_id, full_url, short_code FROM short_links WHERE short_code = ?",
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn short_link_by_full_url(&self, full_url: &str) -> Result<Option<ShortLink>, AppError> {
        sqlx::query_as::<_, ShortLink>(
            "SELECT recipe_id, full_url, short_code FROM short_links WHERE full_url = ?",
        )
        .bind(full_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Insert a short link. Unique violations (recipe, URL or code already
    /// taken) surface as `BadRequest` so callers can re-read and retry.
    pub async fn insert_short_link(&self, link: &ShortLink) -> Result<(), AppError> {
        sqlx::query("INSERT INTO short_links (recipe_id, full_url, short_code) VALUES (?, ?, ?)")
            .bind(link.recipe_id)
            .bind(&link.full_url)
            .bind(&link.short_code)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_db_conflict(e, "Short link already exists"))?;
        Ok(())
    }

    pub async fn delete_short_link(&self, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }
}
