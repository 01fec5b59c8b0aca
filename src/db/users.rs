// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account operations.

use super::{db_error, Database};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::time_utils::now_rfc3339;

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, avatar, created_at";

impl Database {
    /// Insert a new user. Fails with `BadRequest` if the email or username is taken.
    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let created_at = now_rfc3339();

        let id = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_db_conflict(e, "A user with this email or username already exists")
        })?
        .last_insert_rowid();

        tracing::info!(user_id = id, username = %user.username, "User created");

        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::Database(format!("User {} vanished after insert", id)))
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    /// Get a user by email (case-insensitive).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    /// List users ordered by username.
    pub async fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Total number of users.
    pub async fn count_users(&self) -> Result<u64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(count as u64)
    }

    /// Replace a user's password hash.
    pub async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Set or clear a user's avatar.
    pub async fn set_avatar(&self, user_id: i64, avatar: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET avatar = ? WHERE id = ?")
            .bind(avatar)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
