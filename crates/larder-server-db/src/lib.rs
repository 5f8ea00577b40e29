// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data managers for Larder server.
//!
//! Each entity family has a `*Store` trait. Every operation takes the request's
//! [`CancellationToken`](tokio_util::sync::CancellationToken) and returns
//! [`DataError::Cancelled`] at its first blocking point once it fires. A lookup
//! with no result returns [`DataError::NotFound`].
//!
//! [`MemoryStore`] implements every trait.

pub mod error;
pub mod filter;
pub mod household;
pub mod invitation;
pub mod meal_plan;
pub mod memory;
pub mod recipe;
pub mod types;
pub mod user;
pub mod valid_ingredient;
pub mod webhook;

pub use error::{DataError, Result};
pub use filter::{QueryFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use household::HouseholdStore;
pub use invitation::InvitationStore;
pub use meal_plan::MealPlanStore;
pub use memory::{checkpoint, MemoryStore};
pub use recipe::RecipeStore;
pub use types::{
	Household, HouseholdInvitation, HouseholdUserMembership, InvitationStatus, MealPlan,
	MealPlanStatus, Recipe, User, ValidIngredient, Webhook, WebhookTriggerEvent,
};
pub use user::UserStore;
pub use valid_ingredient::ValidIngredientStore;
pub use webhook::WebhookStore;
