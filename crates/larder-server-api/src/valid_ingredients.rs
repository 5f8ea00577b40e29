// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::Utc;
use larder_server_auth::ValidIngredientId;
use larder_server_db::ValidIngredient;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "valid_ingredient_creation")]
pub struct ValidIngredientCreationRequest {
	pub name: String,
	#[serde(default)]
	pub plural_name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub is_liquid: bool,
	#[serde(default)]
	pub animal_derived: bool,
}

impl ValidIngredientCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::name("name", &self.name)?;
		validation::max_len("plural_name", &self.plural_name, validation::MAX_NAME_LEN)
	}

	pub fn into_valid_ingredient(self) -> ValidIngredient {
		ValidIngredient {
			id: ValidIngredientId::generate(),
			name: self.name.trim().to_string(),
			plural_name: self.plural_name,
			description: self.description,
			is_liquid: self.is_liquid,
			animal_derived: self.animal_derived,
			created_at: Utc::now(),
			last_updated_at: None,
			archived_at: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "valid_ingredient_update")]
pub struct ValidIngredientUpdateRequest {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub plural_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_liquid: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub animal_derived: Option<bool>,
}

impl ValidIngredientUpdateRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::any_present(
			"valid_ingredient",
			&[
				self.name.is_some(),
				self.plural_name.is_some(),
				self.description.is_some(),
				self.is_liquid.is_some(),
				self.animal_derived.is_some(),
			],
		)?;
		validation::optional_name("name", self.name.as_deref())
	}

	pub fn apply_to(self, ingredient: &mut ValidIngredient) {
		if let Some(name) = self.name {
			ingredient.name = name.trim().to_string();
		}
		if let Some(plural_name) = self.plural_name {
			ingredient.plural_name = plural_name;
		}
		if let Some(description) = self.description {
			ingredient.description = description;
		}
		if let Some(is_liquid) = self.is_liquid {
			ingredient.is_liquid = is_liquid;
		}
		if let Some(animal_derived) = self.animal_derived {
			ingredient.animal_derived = animal_derived;
		}
	}
}
