// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response bodies for the Larder HTTP API.
//!
//! Every request type has a `validate()` that enforces structural rules after
//! decoding. Types serialize in both JSON and XML; the serde `rename` on each
//! struct is its XML root element.

pub mod common;
pub mod households;
pub mod invitations;
pub mod meal_plans;
pub mod recipes;
pub mod users;
pub mod valid_ingredients;
pub mod validation;
pub mod webhooks;

pub use common::{IdResponse, ListResponse, PageQuery, SearchQuery};
pub use households::{
	HouseholdCreationRequest, HouseholdUpdateRequest, ModifyMemberRolesRequest,
	TransferOwnershipRequest,
};
pub use invitations::{InvitationCreationRequest, InvitationUpdateRequest};
pub use meal_plans::{MealPlanCreationRequest, MealPlanUpdateRequest};
pub use recipes::{slugify, RecipeCreationRequest, RecipeUpdateRequest};
pub use users::{PermissionCheckRequest, PermissionCheckResponse, UserStatusUpdateRequest};
pub use valid_ingredients::{ValidIngredientCreationRequest, ValidIngredientUpdateRequest};
pub use validation::ValidationError;
pub use webhooks::{WebhookCreationRequest, WebhookTriggerEventCreationRequest};
