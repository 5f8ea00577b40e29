// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by authorization and the rest of the server.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for each entity type
//!   ([`UserId`], [`HouseholdId`], [`WebhookId`], etc.) preventing accidental mixing
//! - **Account status**: The service-level standing of a user ([`AccountStatus`])
//! - **Role enums**: Service roles ([`ServiceRole`]) and household roles
//!   ([`HouseholdRole`]) whose names are registered with the RBAC engine
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(HouseholdId, "Unique identifier for a household.");
define_id_type!(InvitationId, "Unique identifier for a household invitation.");
define_id_type!(WebhookId, "Unique identifier for a webhook.");
define_id_type!(
	WebhookTriggerEventId,
	"Unique identifier for a webhook trigger event."
);
define_id_type!(MealPlanId, "Unique identifier for a meal plan.");
define_id_type!(RecipeId, "Unique identifier for a recipe.");
define_id_type!(ValidIngredientId, "Unique identifier for a valid ingredient.");

// =============================================================================
// Account Status
// =============================================================================

/// Service-level standing of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
	/// Account exists but has not been verified yet.
	#[default]
	Unverified,
	/// Account is in good standing.
	Good,
	/// Account has been banned by a service admin.
	Banned,
	/// Account is terminated and will not be restored.
	Terminated,
}

impl AccountStatus {
	/// Returns all account statuses.
	pub fn all() -> &'static [AccountStatus] {
		&[
			AccountStatus::Unverified,
			AccountStatus::Good,
			AccountStatus::Banned,
			AccountStatus::Terminated,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			AccountStatus::Unverified => "unverified",
			AccountStatus::Good => "good",
			AccountStatus::Banned => "banned",
			AccountStatus::Terminated => "terminated",
		}
	}

	/// Returns true if the account may use the service.
	pub fn is_usable(&self) -> bool {
		matches!(self, AccountStatus::Unverified | AccountStatus::Good)
	}
}

impl fmt::Display for AccountStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AccountStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AccountStatus::all()
			.iter()
			.copied()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| format!("unknown account status '{s}'"))
	}
}

// =============================================================================
// Roles
// =============================================================================

/// Service-wide roles. Every user holds at least [`ServiceRole::ServiceUser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRole {
	/// Baseline identity with no permissions of its own.
	ServiceUser,
	/// Operator of the whole service.
	ServiceAdmin,
}

impl ServiceRole {
	/// Returns all available service roles.
	pub fn all() -> &'static [ServiceRole] {
		&[ServiceRole::ServiceUser, ServiceRole::ServiceAdmin]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ServiceRole::ServiceUser => "service_user",
			ServiceRole::ServiceAdmin => "service_admin",
		}
	}
}

impl fmt::Display for ServiceRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ServiceRole {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ServiceRole::all()
			.iter()
			.copied()
			.find(|role| role.as_str() == s)
			.ok_or_else(|| format!("unknown service role '{s}'"))
	}
}

/// Roles within a household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdRole {
	/// Standard member access.
	HouseholdMember,
	/// Manage members, webhooks and meal plans.
	HouseholdAdmin,
}

impl HouseholdRole {
	/// Returns all available household roles.
	pub fn all() -> &'static [HouseholdRole] {
		&[HouseholdRole::HouseholdMember, HouseholdRole::HouseholdAdmin]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			HouseholdRole::HouseholdMember => "household_member",
			HouseholdRole::HouseholdAdmin => "household_admin",
		}
	}
}

impl fmt::Display for HouseholdRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for HouseholdRole {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		HouseholdRole::all()
			.iter()
			.copied()
			.find(|role| role.as_str() == s)
			.ok_or_else(|| format!("unknown household role '{s}'"))
	}
}
