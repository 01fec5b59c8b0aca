// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loading the tag and ingredient catalog from JSON fixtures.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{NewIngredient, NewTag};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Rows inserted by one import run. Rows that already existed are skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub ingredients: u64,
    pub tags: u64,
}

/// Parse a JSON array fixture from disk.
pub fn load_fixture<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>, ImportError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .map_err(|e| ImportError::Io(path.display().to_string(), e.to_string()))?;
    parse_fixture(&data).map_err(|e| ImportError::Parse(path.display().to_string(), e))
}

fn parse_fixture<T: DeserializeOwned>(data: &str) -> Result<Vec<T>, String> {
    serde_json::from_str(data).map_err(|e| e.to_string())
}

/// Import both fixtures. Duplicates of existing rows are ignored, so the
/// import can be re-run safely.
pub async fn import_catalog(
    db: &Database,
    ingredients_path: impl AsRef<Path>,
    tags_path: impl AsRef<Path>,
) -> Result<ImportSummary, ImportError> {
    let ingredients: Vec<NewIngredient> = load_fixture(ingredients_path)?;
    let tags: Vec<NewTag> = load_fixture(tags_path)?;

    let summary = ImportSummary {
        ingredients: db.insert_ingredients(&ingredients).await?,
        tags: db.insert_tags(&tags).await?,
    };

    tracing::info!(
        ingredients_read = ingredients.len(),
        ingredients_inserted = summary.ingredients,
        tags_read = tags.len(),
        tags_inserted = summary.tags,
        "Catalog import finished"
    );
    Ok(summary)
}

/// Errors from fixture import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read {0}: {1}")]
    Io(String, String),

    #[error("Failed to parse {0}: {1}")]
    Parse(String, String),

    #[error("Database error: {0}")]
    Database(#[from] AppError),
}
