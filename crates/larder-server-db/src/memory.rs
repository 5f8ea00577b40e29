// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory store backing every data manager.

use std::collections::HashMap;
use std::sync::Arc;

use larder_server_auth::{
	HouseholdId, InvitationId, MealPlanId, RecipeId, UserId, ValidIngredientId, WebhookId,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::types::{
	Household, HouseholdInvitation, MealPlan, Recipe, User, ValidIngredient, Webhook,
};

#[derive(Debug, Default)]
pub(crate) struct Tables {
	pub users: HashMap<UserId, User>,
	pub households: HashMap<HouseholdId, Household>,
	pub invitations: HashMap<InvitationId, HouseholdInvitation>,
	pub webhooks: HashMap<WebhookId, Webhook>,
	pub meal_plans: HashMap<MealPlanId, MealPlan>,
	pub recipes: HashMap<RecipeId, Recipe>,
	pub valid_ingredients: HashMap<ValidIngredientId, ValidIngredient>,
}

/// Process-local store implementing every `*Store` trait.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	tables: Arc<RwLock<Tables>>,
}

/// Returns [`DataError::Cancelled`] once `cancel` has fired.
pub fn checkpoint(cancel: &CancellationToken) -> Result<()> {
	if cancel.is_cancelled() {
		return Err(DataError::Cancelled);
	}
	Ok(())
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) async fn read(&self, cancel: &CancellationToken) -> Result<RwLockReadGuard<'_, Tables>> {
		checkpoint(cancel)?;
		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(DataError::Cancelled),
			guard = self.tables.read() => Ok(guard),
		}
	}

	pub(crate) async fn write(
		&self,
		cancel: &CancellationToken,
	) -> Result<RwLockWriteGuard<'_, Tables>> {
		checkpoint(cancel)?;
		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(DataError::Cancelled),
			guard = self.tables.write() => Ok(guard),
		}
	}
}
