// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::RecipeId;
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::MemoryStore;
use crate::types::{matches_query, Recipe};

#[async_trait]
pub trait RecipeStore: Send + Sync {
	async fn create_recipe(&self, cancel: &CancellationToken, recipe: &Recipe) -> Result<()>;
	async fn get_recipe(&self, cancel: &CancellationToken, id: RecipeId) -> Result<Recipe>;
	async fn list_recipes(
		&self,
		cancel: &CancellationToken,
		filter: &QueryFilter,
	) -> Result<Vec<Recipe>>;
	/// Recipes whose name or description contains `query`, ignoring case.
	async fn search_recipes(
		&self,
		cancel: &CancellationToken,
		query: &str,
		filter: &QueryFilter,
	) -> Result<Vec<Recipe>>;
	async fn update_recipe(&self, cancel: &CancellationToken, recipe: &Recipe) -> Result<()>;
	async fn archive_recipe(&self, cancel: &CancellationToken, id: RecipeId) -> Result<()>;
}

impl MemoryStore {
	async fn live_recipes(
		&self,
		cancel: &CancellationToken,
		predicate: impl Fn(&Recipe) -> bool + Send,
	) -> Result<Vec<Recipe>> {
		let tables = self.read(cancel).await?;
		let mut recipes: Vec<Recipe> = tables
			.recipes
			.values()
			.filter(|r| r.archived_at.is_none() && predicate(r))
			.cloned()
			.collect();
		recipes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
		Ok(recipes)
	}
}

#[async_trait]
impl RecipeStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, recipe), fields(recipe_id = %recipe.id))]
	async fn create_recipe(&self, cancel: &CancellationToken, recipe: &Recipe) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let slug_taken = tables
			.recipes
			.values()
			.any(|r| r.archived_at.is_none() && r.slug == recipe.slug);
		if slug_taken || tables.recipes.contains_key(&recipe.id) {
			return Err(DataError::Conflict(format!("recipe {} exists", recipe.slug)));
		}
		tables.recipes.insert(recipe.id, recipe.clone());
		Ok(())
	}

	async fn get_recipe(&self, cancel: &CancellationToken, id: RecipeId) -> Result<Recipe> {
		let tables = self.read(cancel).await?;
		tables
			.recipes
			.get(&id)
			.filter(|r| r.archived_at.is_none())
			.cloned()
			.ok_or_else(|| DataError::not_found(format!("recipe {id}")))
	}

	async fn list_recipes(
		&self,
		cancel: &CancellationToken,
		filter: &QueryFilter,
	) -> Result<Vec<Recipe>> {
		Ok(filter.paginate(self.live_recipes(cancel, |_| true).await?))
	}

	async fn search_recipes(
		&self,
		cancel: &CancellationToken,
		query: &str,
		filter: &QueryFilter,
	) -> Result<Vec<Recipe>> {
		let found = self
			.live_recipes(cancel, |r| {
				matches_query(&r.name, query) || matches_query(&r.description, query)
			})
			.await?;
		Ok(filter.paginate(found))
	}

	#[tracing::instrument(skip(self, cancel, recipe), fields(recipe_id = %recipe.id))]
	async fn update_recipe(&self, cancel: &CancellationToken, recipe: &Recipe) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let existing = tables
			.recipes
			.get_mut(&recipe.id)
			.filter(|r| r.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("recipe {}", recipe.id)))?;
		existing.name = recipe.name.clone();
		existing.description = recipe.description.clone();
		existing.source = recipe.source.clone();
		existing.yields_portions = recipe.yields_portions;
		existing.last_updated_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn archive_recipe(&self, cancel: &CancellationToken, id: RecipeId) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let recipe = tables
			.recipes
			.get_mut(&id)
			.filter(|r| r.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("recipe {id}")))?;
		recipe.archived_at = Some(Utc::now());
		Ok(())
	}
}
