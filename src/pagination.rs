// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page-number pagination for list endpoints.
//!
//! Lists answer with `{count, next, previous, results}`, where `next` and
//! `previous` are absolute URLs that keep every other query parameter of the
//! original request.

use crate::error::AppError;
use axum::http::Uri;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upper bound on `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build from the raw `page` and `limit` query values.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest(
                "Page must be greater than 0".to_string(),
            ));
        }

        let limit = limit.unwrap_or(default_limit);
        if limit < 1 {
            return Err(AppError::BadRequest(
                "Limit must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Page<T> {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap `results` for `request`, linking neighbours relative to `uri`.
    pub fn new(results: Vec<T>, count: u64, request: PageRequest, public_url: &str, uri: &Uri) -> Self {
        let seen = u64::from(request.offset()) + results.len() as u64;
        let next = (seen < count).then(|| page_link(public_url, uri, request.page + 1));
        let previous = (request.page > 1).then(|| page_link(public_url, uri, request.page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Absolute URL of `uri` with its `page` parameter replaced.
fn page_link(public_url: &str, uri: &Uri, page: u32) -> String {
    let mut pairs: Vec<&str> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_page_param(pair))
        .collect();
    let page_pair = format!("page={}", page);
    pairs.push(&page_pair);

    format!("{}{}?{}", public_url, uri.path(), pairs.join("&"))
}

fn is_page_param(pair: &str) -> bool {
    let key = pair.split('=').next().unwrap_or("");
    urlencoding::decode(key).map(|k| k == "page").unwrap_or(false)
}
