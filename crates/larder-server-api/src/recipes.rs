// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::Utc;
use larder_server_auth::{RecipeId, UserId};
use larder_server_db::Recipe;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

/// Lowercases and joins alphanumeric runs with `-`.
pub fn slugify(name: &str) -> String {
	name.split(|c: char| !c.is_alphanumeric())
		.filter(|part| !part.is_empty())
		.map(str::to_lowercase)
		.collect::<Vec<_>>()
		.join("-")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "recipe_creation")]
pub struct RecipeCreationRequest {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slug: Option<String>,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub source: String,
	pub yields_portions: u32,
}

impl RecipeCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::name("name", &self.name)?;
		if let Some(slug) = &self.slug {
			if slug.is_empty() || slugify(slug) != *slug {
				return Err(ValidationError::new(
					"slug",
					"must be lowercase words joined by '-'",
				));
			}
		}
		if self.yields_portions == 0 {
			return Err(ValidationError::new("yields_portions", "must be at least 1"));
		}
		Ok(())
	}

	pub fn into_recipe(self, user_id: UserId) -> Recipe {
		let slug = self.slug.unwrap_or_else(|| slugify(&self.name));
		Recipe {
			id: RecipeId::generate(),
			name: self.name.trim().to_string(),
			slug,
			description: self.description,
			source: self.source,
			yields_portions: self.yields_portions,
			created_by_user: user_id,
			created_at: Utc::now(),
			last_updated_at: None,
			archived_at: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "recipe_update")]
pub struct RecipeUpdateRequest {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub yields_portions: Option<u32>,
}

impl RecipeUpdateRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::any_present(
			"recipe",
			&[
				self.name.is_some(),
				self.description.is_some(),
				self.source.is_some(),
				self.yields_portions.is_some(),
			],
		)?;
		validation::optional_name("name", self.name.as_deref())?;
		if self.yields_portions == Some(0) {
			return Err(ValidationError::new("yields_portions", "must be at least 1"));
		}
		Ok(())
	}

	pub fn apply_to(self, recipe: &mut Recipe) {
		if let Some(name) = self.name {
			recipe.name = name.trim().to_string();
		}
		if let Some(description) = self.description {
			recipe.description = description;
		}
		if let Some(source) = self.source {
			recipe.source = source;
		}
		if let Some(portions) = self.yields_portions {
			recipe.yields_portions = portions;
		}
	}
}
