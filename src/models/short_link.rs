//! Short link model.

/// Stored short link for a recipe.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortLink {
    pub recipe_id: i64,
    /// Canonical recipe URL this link resolves to (unique)
    pub full_url: String,
    /// Hex hash code used in `/s/{code}` (unique)
    pub short_code: String,
}
