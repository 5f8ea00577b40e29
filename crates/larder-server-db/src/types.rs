// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stored entities.
//!
//! Every entity serializes in both JSON and XML. Collections carry
//! `#[serde(default)]` because XML has no representation for an empty list,
//! and optional fields are omitted rather than written as empty elements.

use chrono::{DateTime, Utc};
use larder_server_auth::{
	AccountStatus, HouseholdId, HouseholdRole, InvitationId, MealPlanId, RecipeId, UserId,
	ValidIngredientId, WebhookId, WebhookTriggerEventId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "user")]
pub struct User {
	pub id: UserId,
	pub username: String,
	pub email_address: String,
	pub account_status: AccountStatus,
	#[serde(default)]
	pub account_status_explanation: String,
	#[serde(default)]
	pub service_roles: Vec<String>,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

impl User {
	pub fn new(username: impl Into<String>, email_address: impl Into<String>) -> Self {
		Self {
			id: UserId::generate(),
			username: username.into(),
			email_address: email_address.into(),
			account_status: AccountStatus::Good,
			account_status_explanation: String::new(),
			service_roles: vec![larder_server_auth::ServiceRole::ServiceUser.to_string()],
			created_at: Utc::now(),
			last_updated_at: None,
			archived_at: None,
		}
	}
}

// =============================================================================
// Households
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_user_membership")]
pub struct HouseholdUserMembership {
	pub belongs_to_user: UserId,
	pub belongs_to_household: HouseholdId,
	#[serde(default)]
	pub household_roles: Vec<String>,
	#[serde(default)]
	pub default_household: bool,
	pub created_at: DateTime<Utc>,
}

impl HouseholdUserMembership {
	pub fn new(household_id: HouseholdId, user_id: UserId, role: HouseholdRole) -> Self {
		Self {
			belongs_to_user: user_id,
			belongs_to_household: household_id,
			household_roles: vec![role.to_string()],
			default_household: false,
			created_at: Utc::now(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household")]
pub struct Household {
	pub id: HouseholdId,
	pub name: String,
	#[serde(default)]
	pub contact_phone: String,
	/// The owner.
	pub belongs_to_user: UserId,
	#[serde(default)]
	pub members: Vec<HouseholdUserMembership>,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

impl Household {
	/// A new household owned by `owner`, who is its first admin.
	pub fn new(name: impl Into<String>, owner: UserId) -> Self {
		let id = HouseholdId::generate();
		Self {
			id,
			name: name.into(),
			contact_phone: String::new(),
			belongs_to_user: owner,
			members: vec![HouseholdUserMembership::new(
				id,
				owner,
				HouseholdRole::HouseholdAdmin,
			)],
			created_at: Utc::now(),
			last_updated_at: None,
			archived_at: None,
		}
	}

	pub fn membership(&self, user_id: UserId) -> Option<&HouseholdUserMembership> {
		self.members.iter().find(|m| m.belongs_to_user == user_id)
	}

	pub fn has_member(&self, user_id: UserId) -> bool {
		self.membership(user_id).is_some()
	}
}

// =============================================================================
// Invitations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
	Pending,
	Accepted,
	Rejected,
	Cancelled,
}

impl InvitationStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			InvitationStatus::Pending => "pending",
			InvitationStatus::Accepted => "accepted",
			InvitationStatus::Rejected => "rejected",
			InvitationStatus::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for InvitationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_invitation")]
pub struct HouseholdInvitation {
	pub id: InvitationId,
	pub destination_household: HouseholdId,
	pub from_user: UserId,
	pub to_email: String,
	/// Set when the recipient already has an account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_user: Option<UserId>,
	#[serde(default)]
	pub note: String,
	pub status: InvitationStatus,
	#[serde(default)]
	pub status_note: String,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
}

impl HouseholdInvitation {
	pub fn new(
		destination_household: HouseholdId,
		from_user: UserId,
		to_email: impl Into<String>,
		to_user: Option<UserId>,
		note: impl Into<String>,
	) -> Self {
		Self {
			id: InvitationId::generate(),
			destination_household,
			from_user,
			to_email: to_email.into(),
			to_user,
			note: note.into(),
			status: InvitationStatus::Pending,
			status_note: String::new(),
			created_at: Utc::now(),
			last_updated_at: None,
		}
	}
}

// =============================================================================
// Webhooks
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "webhook_trigger_event")]
pub struct WebhookTriggerEvent {
	pub id: WebhookTriggerEventId,
	pub trigger_event: String,
	pub belongs_to_webhook: WebhookId,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

impl WebhookTriggerEvent {
	pub fn new(webhook_id: WebhookId, trigger_event: impl Into<String>) -> Self {
		Self {
			id: WebhookTriggerEventId::generate(),
			trigger_event: trigger_event.into(),
			belongs_to_webhook: webhook_id,
			created_at: Utc::now(),
			archived_at: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "webhook")]
pub struct Webhook {
	pub id: WebhookId,
	pub name: String,
	pub content_type: String,
	pub url: String,
	pub method: String,
	pub belongs_to_household: HouseholdId,
	#[serde(default)]
	pub trigger_events: Vec<WebhookTriggerEvent>,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Meal plans
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPlanStatus {
	#[default]
	AwaitingVotes,
	Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "meal_plan")]
pub struct MealPlan {
	pub id: MealPlanId,
	#[serde(default)]
	pub notes: String,
	pub status: MealPlanStatus,
	pub voting_deadline: DateTime<Utc>,
	pub belongs_to_household: HouseholdId,
	pub created_by_user: UserId,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Recipes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "recipe")]
pub struct Recipe {
	pub id: RecipeId,
	pub name: String,
	pub slug: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub source: String,
	pub yields_portions: u32,
	pub created_by_user: UserId,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Reference data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "valid_ingredient")]
pub struct ValidIngredient {
	pub id: ValidIngredientId,
	pub name: String,
	#[serde(default)]
	pub plural_name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub is_liquid: bool,
	#[serde(default)]
	pub animal_derived: bool,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub archived_at: Option<DateTime<Utc>>,
}

/// Case-insensitive substring match used by the search operations.
pub(crate) fn matches_query(haystack: &str, query: &str) -> bool {
	haystack.to_lowercase().contains(&query.trim().to_lowercase())
}
