// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod import;
pub mod password;
pub mod shopping_list;
pub mod short_link;

pub use import::{import_catalog, ImportError, ImportSummary};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    PasswordError,
};
pub use short_link::ShortLinkService;
