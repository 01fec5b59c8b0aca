// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// PBKDF2 iteration count used when `PASSWORD_ITERATIONS` is not set.
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 260_000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Public base URL of this service (used for recipe and short links)
    pub public_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Default number of items per page
    pub page_size: u32,
    /// PBKDF2 iterations for new password hashes
    pub password_iterations: u32,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = parse_var("PORT", 8080)?;
        let page_size = parse_var("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let password_iterations = parse_var("PASSWORD_ITERATIONS", DEFAULT_PASSWORD_ITERATIONS)?;

        if page_size == 0 {
            return Err(ConfigError::Invalid("PAGE_SIZE", "must be positive".to_string()));
        }
        if password_iterations == 0 {
            return Err(ConfigError::Invalid(
                "PASSWORD_ITERATIONS",
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://foodgram.db".to_string()),
            port,
            public_url: trim_url(
                env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            ),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            page_size,
            password_iterations,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Deterministic config for tests. Uses an in-memory database and a low
    /// PBKDF2 iteration count so password round-trips stay fast.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            public_url: "http://testserver".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            password_iterations: 1_000,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string())),
        Err(_) => Ok(default),
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("PUBLIC_URL", "https://foodgram.example/");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.public_url, "https://foodgram.example");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url("http://a/".to_string()), "http://a");
        assert_eq!(trim_url("http://a".to_string()), "http://a");
    }
}
