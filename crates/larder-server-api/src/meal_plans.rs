// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use larder_server_auth::{HouseholdId, MealPlanId, UserId};
use larder_server_db::{MealPlan, MealPlanStatus};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "meal_plan_creation")]
pub struct MealPlanCreationRequest {
	#[serde(default)]
	pub notes: String,
	pub voting_deadline: DateTime<Utc>,
}

impl MealPlanCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::max_len("notes", &self.notes, 4096)?;
		if self.voting_deadline <= Utc::now() {
			return Err(ValidationError::new("voting_deadline", "must be in the future"));
		}
		Ok(())
	}

	pub fn into_meal_plan(self, household_id: HouseholdId, user_id: UserId) -> MealPlan {
		MealPlan {
			id: MealPlanId::generate(),
			notes: self.notes,
			status: MealPlanStatus::AwaitingVotes,
			voting_deadline: self.voting_deadline,
			belongs_to_household: household_id,
			created_by_user: user_id,
			created_at: Utc::now(),
			last_updated_at: None,
			archived_at: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "meal_plan_update")]
pub struct MealPlanUpdateRequest {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<MealPlanStatus>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub voting_deadline: Option<DateTime<Utc>>,
}

impl MealPlanUpdateRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::any_present(
			"meal_plan",
			&[
				self.notes.is_some(),
				self.status.is_some(),
				self.voting_deadline.is_some(),
			],
		)?;
		if let Some(notes) = &self.notes {
			validation::max_len("notes", notes, 4096)?;
		}
		Ok(())
	}

	pub fn apply_to(self, meal_plan: &mut MealPlan) {
		if let Some(notes) = self.notes {
			meal_plan.notes = notes;
		}
		if let Some(status) = self.status {
			meal_plan.status = status;
		}
		if let Some(deadline) = self.voting_deadline {
			meal_plan.voting_deadline = deadline;
		}
	}
}
