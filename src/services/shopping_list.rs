// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of a user's shopping list.

use crate::models::ShoppingListItem;
use std::fmt::Write as _;

/// File name offered to the browser for the download.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// Render aggregated items one per line as `name unit - amount`.
///
/// Items are expected in display order already; an empty cart renders as an
/// empty string.
pub fn render(items: &[ShoppingListItem]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{} {} - {}",
            item.name, item.measurement_unit, item.total_amount
        );
    }
    out
}
