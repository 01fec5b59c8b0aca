// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe operations, including the recipe↔tag and recipe↔ingredient links.

use super::{db_error, Database};
use crate::error::AppError;
use crate::models::{Recipe, RecipeDraft, RecipeFilter, RecipeIngredientAmount, Tag};
use crate::time_utils::now_rfc3339;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.image, r.cooking_time, r.created_at";

impl Database {
    /// Create a recipe with its tags and ingredient amounts in one transaction.
    ///
    /// The draft must carry an image.
    pub async fn create_recipe(&self, author_id: i64, draft: &RecipeDraft) -> Result<i64, AppError> {
        let image = draft
            .image
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Recipe image is required".to_string()))?;
        let created_at = now_rfc3339();

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let recipe_id = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, text, image, cooking_time, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(author_id)
        .bind(&draft.name)
        .bind(&draft.text)
        .bind(image)
        .bind(draft.cooking_time)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        insert_links(&mut *tx, recipe_id, draft).await?;
        tx.commit().await.map_err(db_error)?;

        tracing::info!(recipe_id, author_id, name = %draft.name, "Recipe created");
        Ok(recipe_id)
    }

    /// Replace a recipe's fields, tags and ingredients. The stored image is
    /// kept when the draft has none.
    pub async fn update_recipe(&self, recipe_id: i64, draft: &RecipeDraft) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query(
            r"
            UPDATE recipes
            SET name = ?, text = ?, cooking_time = ?, image = COALESCE(?, image)
            WHERE id = ?
            ",
        )
        .bind(&draft.name)
        .bind(&draft.text)
        .bind(draft.cooking_time)
        .bind(draft.image.as_deref())
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        insert_links(&mut *tx, recipe_id, draft).await?;
        tx.commit().await.map_err(db_error)?;

        tracing::info!(recipe_id, "Recipe updated");
        Ok(())
    }

    /// Delete a recipe. Links, favorites, cart entries and short links cascade.
    /// Returns whether a row was removed.
    pub async fn delete_recipe(&self, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_recipe(&self, recipe_id: i64) -> Result<Option<Recipe>, AppError> {
        sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?"))
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    /// List recipes matching `filter`, newest first.
    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Recipe>, AppError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r"));
        push_filters(&mut query, filter);
        query.push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ");
        query.push_bind(i64::from(limit));
        query.push(" OFFSET ");
        query.push_bind(i64::from(offset));

        query
            .build_query_as::<Recipe>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }

    /// Number of recipes matching `filter`.
    pub async fn count_recipes(&self, filter: &RecipeFilter) -> Result<u64, AppError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
        push_filters(&mut query, filter);

        let (count,): (i64,) = query
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count as u64)
    }

    /// Tags of a recipe ordered by name.
    pub async fn recipe_tags(&self, recipe_id: i64) -> Result<Vec<Tag>, AppError> {
        sqlx::query_as::<_, Tag>(
            r"
            SELECT t.id, t.name, t.slug
            FROM tags t
            JOIN recipe_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = ?
            ORDER BY t.name
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Ingredient lines of a recipe in insertion order.
    pub async fn recipe_ingredients(
        &self,
        recipe_id: i64,
    ) -> Result<Vec<RecipeIngredientAmount>, AppError> {
        sqlx::query_as::<_, RecipeIngredientAmount>(
            r"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ?
            ORDER BY ri.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Recipes of one author, newest first, optionally capped.
    pub async fn recipes_by_author(
        &self,
        author_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Recipe>, AppError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);
        sqlx::query_as::<_, Recipe>(&format!(
            r"
            SELECT {RECIPE_COLUMNS} FROM recipes r
            WHERE r.author_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?
            "
        ))
        .bind(author_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn count_recipes_by_author(&self, author_id: i64) -> Result<u64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count as u64)
    }
}

async fn insert_links(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> Result<(), AppError> {
    for tag_id in &draft.tag_ids {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(*tag_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::from_db_conflict(e, "Tags must not repeat"))?;
    }

    for item in &draft.ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(item.id)
        .bind(item.amount)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_db_conflict(e, "Ingredients must not repeat"))?;
    }

    Ok(())
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(author_id) = filter.author_id {
        query.push(" AND r.author_id = ");
        query.push_bind(author_id);
    }

    if !filter.tag_slugs.is_empty() {
        query.push(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut separated = query.separated(", ");
        for slug in &filter.tag_slugs {
            separated.push_bind(slug.clone());
        }
        separated.push_unseparated("))");
    }

    if let Some(user_id) = filter.favorited_by {
        query.push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ");
        query.push_bind(user_id);
        query.push(")");
    }

    if let Some(user_id) = filter.in_cart_of {
        query.push(
            " AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ",
        );
        query.push_bind(user_id);
        query.push(")");
    }
}
