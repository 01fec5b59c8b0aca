// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod catalog;
pub mod recipe;
pub mod shopping;
pub mod short_link;
pub mod user;

pub use catalog::{Ingredient, NewIngredient, NewTag, Tag};
pub use recipe::{
    Recipe, RecipeDraft, RecipeFilter, RecipeIngredientAmount, RecipeIngredientInput,
    RecipePayload,
};
pub use shopping::ShoppingListItem;
pub use short_link::ShortLink;
pub use user::{NewUser, User};
