// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Load the tag and ingredient catalog into the database.
//!
//! Usage: `import-data` with `DATABASE_URL`, `INGREDIENTS_PATH` and
//! `TAGS_PATH` taken from the environment (or `.env`). Existing rows are
//! left untouched, so the import can be repeated.

use anyhow::Context;
use foodgram::{db::Database, services::import_catalog};
use std::env;

const DEFAULT_INGREDIENTS_PATH: &str = "data/ingredients.json";
const DEFAULT_TAGS_PATH: &str = "data/tags.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://foodgram.db".to_string());
    let ingredients_path =
        env::var("INGREDIENTS_PATH").unwrap_or_else(|_| DEFAULT_INGREDIENTS_PATH.to_string());
    let tags_path = env::var("TAGS_PATH").unwrap_or_else(|_| DEFAULT_TAGS_PATH.to_string());

    let db = Database::connect(&database_url)
        .await
        .with_context(|| format!("Failed to open {}", database_url))?;

    let summary = import_catalog(&db, &ingredients_path, &tags_path).await?;

    println!(
        "Imported {} ingredients from {} and {} tags from {}",
        summary.ingredients, ingredients_path, summary.tags, tags_path
    );
    Ok(())
}
