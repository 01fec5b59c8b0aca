// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short links for recipes.
//!
//! A short code is the hex encoding of the first bytes of SHA-256 over the
//! recipe's canonical URL, so the same URL always maps to the same code.
//! Links are created on first request and reused afterwards.

use crate::db::Database;
use crate::error::AppError;
use crate::models::ShortLink;
use sha2::{Digest, Sha256};

/// Bytes of digest used for a new short code (6 hex characters).
pub const DEFAULT_DIGEST_LEN: usize = 3;
const MAX_DIGEST_LEN: usize = 32;

/// Hex code of the first `digest_len` bytes of SHA-256(`full_url`).
pub fn short_code(full_url: &str, digest_len: usize) -> String {
    let digest = Sha256::digest(full_url.as_bytes());
    hex::encode(&digest[..digest_len.clamp(1, MAX_DIGEST_LEN)])
}

/// Builds canonical recipe URLs and resolves them to short links.
#[derive(Debug, Clone)]
pub struct ShortLinkService {
    public_url: String,
}

impl ShortLinkService {
    pub fn new(public_url: &str) -> Self {
        Self {
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Canonical URL of a recipe page.
    pub fn recipe_url(&self, recipe_id: i64) -> String {
        format!("{}/recipes/{}/", self.public_url, recipe_id)
    }

    /// Public URL for a short code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/s/{}", self.public_url, short_code)
    }

    /// Return the short link for a recipe, creating it if needed.
    ///
    /// If the code for the URL is already held by a different URL, the code
    /// is lengthened one byte at a time until a free one is found.
    pub async fn get_or_create(&self, db: &Database, recipe_id: i64) -> Result<ShortLink, AppError> {
        let full_url = self.recipe_url(recipe_id);

        if let Some(link) = db.short_link_by_full_url(&full_url).await? {
            return Ok(link);
        }

        // A link under an old public URL blocks the one-to-one recipe slot.
        if let Some(stale) = db.short_link_for_recipe(recipe_id).await? {
            tracing::info!(
                recipe_id,
                old_url = %stale.full_url,
                new_url = %full_url,
                "Replacing short link for changed public URL"
            );
            db.delete_short_link(recipe_id).await?;
        }

        for digest_len in DEFAULT_DIGEST_LEN..=MAX_DIGEST_LEN {
            let code = short_code(&full_url, digest_len);

            match db.short_link_by_code(&code).await? {
                Some(existing) if existing.full_url == full_url => return Ok(existing),
                Some(existing) => {
                    tracing::warn!(
                        code = %code,
                        taken_by = %existing.full_url,
                        "Short code collision, lengthening"
                    );
                    continue;
                }
                None => {}
            }

            let link = ShortLink {
                recipe_id,
                full_url: full_url.clone(),
                short_code: code,
            };

            match db.insert_short_link(&link).await {
                Ok(()) => {
                    tracing::info!(recipe_id, code = %link.short_code, "Short link created");
                    return Ok(link);
                }
                // Lost a race with a concurrent request for the same recipe.
                Err(AppError::BadRequest(_)) => {
                    if let Some(existing) = db.short_link_by_full_url(&full_url).await? {
                        return Ok(existing);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "No free short code for {}",
            full_url
        )))
    }
}
