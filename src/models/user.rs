//! User model for storage and API.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Usernames that would shadow fixed routes under `/api/users/`.
const RESERVED_USERNAMES: &[&str] = &["me"];

/// User row stored in SQLite.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Login key, unique
    pub email: String,
    /// Public handle, unique
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// PBKDF2 hash string (see `services::password`)
    pub password_hash: String,
    /// Avatar image as submitted by the client
    pub avatar: Option<String>,
    /// When the account was created (RFC3339)
    pub created_at: String,
}

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(
        length(min = 1, max = 150),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Fields needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Password change payload.
#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

/// Avatar upload payload. The image is stored as given.
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarRequest {
    #[validate(length(min = 1))]
    pub avatar: String,
}

/// Usernames are restricted to letters, digits and `.@+-_`, and must not
/// collide with reserved route names.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if RESERVED_USERNAMES
        .iter()
        .any(|reserved| username.eq_ignore_ascii_case(reserved))
    {
        return Err(ValidationError::new("reserved_username")
            .with_message(format!("Username '{username}' is reserved").into()));
    }

    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'));
    if !valid {
        return Err(ValidationError::new("invalid_username").with_message(
            "Username may contain only letters, digits and .@+-_ characters".into(),
        ));
    }

    Ok(())
}
