// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Foodgram: a recipe-sharing backend
//!
//! Users publish recipes, follow authors, keep favorites and a shopping
//! cart, download an aggregated shopping list and share recipes through
//! short links.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::ShortLinkService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub short_links: ShortLinkService,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let short_links = ShortLinkService::new(&config.public_url);
        Self {
            config,
            db,
            short_links,
        }
    }
}
