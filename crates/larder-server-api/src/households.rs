// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use larder_server_auth::{HouseholdRole, UserId};
use larder_server_db::Household;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_creation")]
pub struct HouseholdCreationRequest {
	pub name: String,
	#[serde(default)]
	pub contact_phone: String,
}

impl HouseholdCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::name("name", &self.name)?;
		validation::max_len("contact_phone", &self.contact_phone, 32)
	}

	pub fn into_household(self, owner: UserId) -> Household {
		let mut household = Household::new(self.name.trim(), owner);
		household.contact_phone = self.contact_phone;
		household
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_update")]
pub struct HouseholdUpdateRequest {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contact_phone: Option<String>,
}

impl HouseholdUpdateRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::any_present("household", &[self.name.is_some(), self.contact_phone.is_some()])?;
		validation::optional_name("name", self.name.as_deref())?;
		if let Some(phone) = &self.contact_phone {
			validation::max_len("contact_phone", phone, 32)?;
		}
		Ok(())
	}

	pub fn apply_to(self, household: &mut Household) {
		if let Some(name) = self.name {
			household.name = name.trim().to_string();
		}
		if let Some(phone) = self.contact_phone {
			household.contact_phone = phone;
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "modify_member_roles")]
pub struct ModifyMemberRolesRequest {
	#[serde(default)]
	pub new_roles: Vec<String>,
	#[serde(default)]
	pub reason: String,
}

impl ModifyMemberRolesRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::required("reason", &self.reason)?;
		if self.new_roles.is_empty() {
			return Err(ValidationError::new("new_roles", "at least one role is required"));
		}
		for role in &self.new_roles {
			role.parse::<HouseholdRole>()
				.map_err(|_| ValidationError::new("new_roles", format!("unknown household role '{role}'")))?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_ownership_transfer")]
pub struct TransferOwnershipRequest {
	pub current_owner: UserId,
	pub new_owner: UserId,
	#[serde(default)]
	pub reason: String,
}

impl TransferOwnershipRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::required("reason", &self.reason)?;
		if self.current_owner == self.new_owner {
			return Err(ValidationError::new(
				"new_owner",
				"must differ from the current owner",
			));
		}
		Ok(())
	}
}
