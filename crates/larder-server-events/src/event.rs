// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data-change event model.
//!
//! - [`DataType`]: the kind of entity that changed
//! - [`EventType`]: what happened to it
//! - [`DataChangeMessage`]: the record handed to the publisher

use chrono::{DateTime, Utc};
use larder_server_auth::{HouseholdId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
	Household,
	HouseholdInvitation,
	Webhook,
	WebhookTriggerEvent,
	MealPlan,
	Recipe,
	ValidIngredient,
	User,
}

impl DataType {
	pub fn as_str(&self) -> &'static str {
		match self {
			DataType::Household => "household",
			DataType::HouseholdInvitation => "household_invitation",
			DataType::Webhook => "webhook",
			DataType::WebhookTriggerEvent => "webhook_trigger_event",
			DataType::MealPlan => "meal_plan",
			DataType::Recipe => "recipe",
			DataType::ValidIngredient => "valid_ingredient",
			DataType::User => "user",
		}
	}
}

impl fmt::Display for DataType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Types of data changes published after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
	// Households
	HouseholdCreated,
	HouseholdUpdated,
	HouseholdArchived,
	HouseholdMembershipPermissionsUpdated,
	HouseholdMemberRemoved,
	HouseholdOwnershipTransferred,
	HouseholdMarkedAsDefault,

	// Invitations
	HouseholdInvitationCreated,
	HouseholdInvitationAccepted,
	HouseholdInvitationRejected,
	HouseholdInvitationCanceled,

	// Webhooks
	WebhookCreated,
	WebhookArchived,
	WebhookTriggerEventCreated,
	WebhookTriggerEventArchived,

	// Meal plans
	MealPlanCreated,
	MealPlanUpdated,
	MealPlanArchived,

	// Recipes
	RecipeCreated,
	RecipeUpdated,
	RecipeArchived,

	// Reference data
	ValidIngredientCreated,
	ValidIngredientUpdated,
	ValidIngredientArchived,

	// Users
	UserAccountStatusUpdated,
}

impl EventType {
	/// The data type this event describes.
	pub fn data_type(&self) -> DataType {
		match self {
			EventType::HouseholdCreated
			| EventType::HouseholdUpdated
			| EventType::HouseholdArchived
			| EventType::HouseholdMembershipPermissionsUpdated
			| EventType::HouseholdMemberRemoved
			| EventType::HouseholdOwnershipTransferred
			| EventType::HouseholdMarkedAsDefault => DataType::Household,
			EventType::HouseholdInvitationCreated
			| EventType::HouseholdInvitationAccepted
			| EventType::HouseholdInvitationRejected
			| EventType::HouseholdInvitationCanceled => DataType::HouseholdInvitation,
			EventType::WebhookCreated | EventType::WebhookArchived => DataType::Webhook,
			EventType::WebhookTriggerEventCreated | EventType::WebhookTriggerEventArchived => {
				DataType::WebhookTriggerEvent
			}
			EventType::MealPlanCreated | EventType::MealPlanUpdated | EventType::MealPlanArchived => {
				DataType::MealPlan
			}
			EventType::RecipeCreated | EventType::RecipeUpdated | EventType::RecipeArchived => {
				DataType::Recipe
			}
			EventType::ValidIngredientCreated
			| EventType::ValidIngredientUpdated
			| EventType::ValidIngredientArchived => DataType::ValidIngredient,
			EventType::UserAccountStatusUpdated => DataType::User,
		}
	}
}

impl fmt::Display for EventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EventType::HouseholdCreated => write!(f, "household_created"),
			EventType::HouseholdUpdated => write!(f, "household_updated"),
			EventType::HouseholdArchived => write!(f, "household_archived"),
			EventType::HouseholdMembershipPermissionsUpdated => {
				write!(f, "household_membership_permissions_updated")
			}
			EventType::HouseholdMemberRemoved => write!(f, "household_member_removed"),
			EventType::HouseholdOwnershipTransferred => write!(f, "household_ownership_transferred"),
			EventType::HouseholdMarkedAsDefault => write!(f, "household_marked_as_default"),
			EventType::HouseholdInvitationCreated => write!(f, "household_invitation_created"),
			EventType::HouseholdInvitationAccepted => write!(f, "household_invitation_accepted"),
			EventType::HouseholdInvitationRejected => write!(f, "household_invitation_rejected"),
			EventType::HouseholdInvitationCanceled => write!(f, "household_invitation_canceled"),
			EventType::WebhookCreated => write!(f, "webhook_created"),
			EventType::WebhookArchived => write!(f, "webhook_archived"),
			EventType::WebhookTriggerEventCreated => write!(f, "webhook_trigger_event_created"),
			EventType::WebhookTriggerEventArchived => write!(f, "webhook_trigger_event_archived"),
			EventType::MealPlanCreated => write!(f, "meal_plan_created"),
			EventType::MealPlanUpdated => write!(f, "meal_plan_updated"),
			EventType::MealPlanArchived => write!(f, "meal_plan_archived"),
			EventType::RecipeCreated => write!(f, "recipe_created"),
			EventType::RecipeUpdated => write!(f, "recipe_updated"),
			EventType::RecipeArchived => write!(f, "recipe_archived"),
			EventType::ValidIngredientCreated => write!(f, "valid_ingredient_created"),
			EventType::ValidIngredientUpdated => write!(f, "valid_ingredient_updated"),
			EventType::ValidIngredientArchived => write!(f, "valid_ingredient_archived"),
			EventType::UserAccountStatusUpdated => write!(f, "user_account_status_updated"),
		}
	}
}

/// A data-change record handed to the publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataChangeMessage {
	pub data_type: DataType,
	pub event_type: EventType,
	pub user_id: UserId,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub household_id: Option<HouseholdId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payload: Option<serde_json::Value>,
	pub timestamp: DateTime<Utc>,
}

impl DataChangeMessage {
	/// Creates a message attributed to `user_id`. The data type follows from
	/// the event type.
	pub fn new(event_type: EventType, user_id: UserId) -> Self {
		Self {
			data_type: event_type.data_type(),
			event_type,
			user_id,
			household_id: None,
			payload: None,
			timestamp: Utc::now(),
		}
	}

	pub fn household(mut self, household_id: HouseholdId) -> Self {
		self.household_id = Some(household_id);
		self
	}

	/// Attaches the affected entity. An entity that cannot be represented as
	/// JSON is left out and the message is still sent.
	pub fn entity<T: Serialize>(mut self, entity: &T) -> Self {
		match serde_json::to_value(entity) {
			Ok(value) => self.payload = Some(value),
			Err(e) => {
				tracing::warn!(event_type = %self.event_type, error = %e, "dropping unserializable event payload");
			}
		}
		self
	}
}
