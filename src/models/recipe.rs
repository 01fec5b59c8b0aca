// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Recipe model for storage and API.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const COOKING_TIME_MIN: i32 = 1;
pub const COOKING_TIME_MAX: i32 = 32_000;
pub const AMOUNT_MIN: i32 = 1;
pub const AMOUNT_MAX: i32 = 32_000;

/// Stored recipe row (without its tags and ingredients).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    /// Image as submitted by the client
    pub image: String,
    /// Minutes, within [COOKING_TIME_MIN, COOKING_TIME_MAX]
    pub cooking_time: i32,
    /// Creation timestamp (RFC3339), used for newest-first ordering
    pub created_at: String,
}

/// Ingredient line of a recipe, joined with the ingredient catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecipeIngredientAmount {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Ingredient reference in a recipe write payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    /// Ingredient ID
    pub id: i64,
    pub amount: i32,
}

/// Create/update payload for a recipe.
///
/// `image` is required on create and optional on update; the route handler
/// enforces that distinction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipePayload {
    #[validate(custom(function = "validate_ingredient_rows"))]
    pub ingredients: Vec<RecipeIngredientInput>,
    #[validate(custom(function = "validate_tag_ids"))]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, max = 32000))]
    pub cooking_time: i32,
}

/// Validated recipe contents ready for insertion.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub tag_ids: Vec<i64>,
    pub ingredients: Vec<RecipeIngredientInput>,
}

impl From<RecipePayload> for RecipeDraft {
    fn from(payload: RecipePayload) -> Self {
        Self {
            name: payload.name,
            text: payload.text,
            image: payload.image.filter(|image| !image.is_empty()),
            cooking_time: payload.cooking_time,
            tag_ids: payload.tags,
            ingredients: payload.ingredients,
        }
    }
}

/// Filters for the recipe listing.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<i64>,
    /// Recipe matches if it carries any of these tag slugs
    pub tag_slugs: Vec<String>,
    /// Only recipes favorited by this user
    pub favorited_by: Option<i64>,
    /// Only recipes in this user's shopping cart
    pub in_cart_of: Option<i64>,
}

fn validate_ingredient_rows(rows: &[RecipeIngredientInput]) -> Result<(), ValidationError> {
    if rows.is_empty() {
        return Err(ValidationError::new("ingredients_required")
            .with_message("At least one ingredient is required".into()));
    }

    if let Some(row) = rows
        .iter()
        .find(|row| !(AMOUNT_MIN..=AMOUNT_MAX).contains(&row.amount))
    {
        return Err(ValidationError::new("amount_out_of_range").with_message(
            format!(
                "Amount for ingredient {} must be between {} and {}",
                row.id, AMOUNT_MIN, AMOUNT_MAX
            )
            .into(),
        ));
    }

    let mut seen = HashSet::with_capacity(rows.len());
    if rows.iter().any(|row| !seen.insert(row.id)) {
        return Err(ValidationError::new("duplicate_ingredient")
            .with_message("Ingredients must not repeat".into()));
    }

    Ok(())
}

fn validate_tag_ids(tags: &[i64]) -> Result<(), ValidationError> {
    if tags.is_empty() {
        return Err(ValidationError::new("tags_required")
            .with_message("At least one tag is required".into()));
    }

    let mut seen = HashSet::with_capacity(tags.len());
    if tags.iter().any(|id| !seen.insert(*id)) {
        return Err(
            ValidationError::new("duplicate_tag").with_message("Tags must not repeat".into())
        );
    }

    Ok(())
}
