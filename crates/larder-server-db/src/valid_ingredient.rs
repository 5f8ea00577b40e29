// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::ValidIngredientId;
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::MemoryStore;
use crate::types::{matches_query, ValidIngredient};

/// Shared reference data; not scoped to any household.
#[async_trait]
pub trait ValidIngredientStore: Send + Sync {
	async fn create_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		ingredient: &ValidIngredient,
	) -> Result<()>;
	async fn get_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		id: ValidIngredientId,
	) -> Result<ValidIngredient>;
	async fn search_valid_ingredients(
		&self,
		cancel: &CancellationToken,
		query: &str,
		filter: &QueryFilter,
	) -> Result<Vec<ValidIngredient>>;
	async fn update_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		ingredient: &ValidIngredient,
	) -> Result<()>;
	async fn archive_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		id: ValidIngredientId,
	) -> Result<()>;
}

#[async_trait]
impl ValidIngredientStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, ingredient), fields(valid_ingredient_id = %ingredient.id))]
	async fn create_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		ingredient: &ValidIngredient,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let name_taken = tables
			.valid_ingredients
			.values()
			.any(|i| i.archived_at.is_none() && i.name.eq_ignore_ascii_case(&ingredient.name));
		if name_taken {
			return Err(DataError::Conflict(format!(
				"valid ingredient {} exists",
				ingredient.name
			)));
		}
		tables
			.valid_ingredients
			.insert(ingredient.id, ingredient.clone());
		Ok(())
	}

	async fn get_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		id: ValidIngredientId,
	) -> Result<ValidIngredient> {
		let tables = self.read(cancel).await?;
		tables
			.valid_ingredients
			.get(&id)
			.filter(|i| i.archived_at.is_none())
			.cloned()
			.ok_or_else(|| DataError::not_found(format!("valid ingredient {id}")))
	}

	async fn search_valid_ingredients(
		&self,
		cancel: &CancellationToken,
		query: &str,
		filter: &QueryFilter,
	) -> Result<Vec<ValidIngredient>> {
		let tables = self.read(cancel).await?;
		let mut found: Vec<ValidIngredient> = tables
			.valid_ingredients
			.values()
			.filter(|i| {
				i.archived_at.is_none()
					&& (matches_query(&i.name, query) || matches_query(&i.plural_name, query))
			})
			.cloned()
			.collect();
		found.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(filter.paginate(found))
	}

	#[tracing::instrument(skip(self, cancel, ingredient), fields(valid_ingredient_id = %ingredient.id))]
	async fn update_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		ingredient: &ValidIngredient,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let existing = tables
			.valid_ingredients
			.get_mut(&ingredient.id)
			.filter(|i| i.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("valid ingredient {}", ingredient.id)))?;
		existing.name = ingredient.name.clone();
		existing.plural_name = ingredient.plural_name.clone();
		existing.description = ingredient.description.clone();
		existing.is_liquid = ingredient.is_liquid;
		existing.animal_derived = ingredient.animal_derived;
		existing.last_updated_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn archive_valid_ingredient(
		&self,
		cancel: &CancellationToken,
		id: ValidIngredientId,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let ingredient = tables
			.valid_ingredients
			.get_mut(&id)
			.filter(|i| i.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("valid ingredient {id}")))?;
		ingredient.archived_at = Some(Utc::now());
		Ok(())
	}
}
