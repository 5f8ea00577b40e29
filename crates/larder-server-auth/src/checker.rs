// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission checkers.
//!
//! A checker is bound to a list of role *names* and resolves them against the
//! process-wide registry on every query. Checkers hold no other state, so they
//! serialize as the bare list of role names.
//!
//! The `can_*` predicates are generated from a table mapping each predicate to
//! a single permission. They exist so handlers read as intent
//! (`checker.can_update_household()`) while the authoritative data stays in the
//! role registry.

use crate::permissions::Permission;
use crate::rbac::rbac;
use crate::types::ServiceRole;
use serde::{Deserialize, Serialize};

/// Anything that can answer "does this caller hold permission P?".
pub trait PermissionChecker {
	fn has(&self, permission: Permission) -> bool;
}

macro_rules! capabilities {
	($checker:ident { $( $(#[$doc:meta])* $method:ident => $permission:ident ),* $(,)? }) => {
		impl $checker {
			$(
				$(#[$doc])*
				pub fn $method(&self) -> bool {
					self.has(Permission::$permission)
				}
			)*

			/// Every capability predicate paired with the permission it checks.
			pub const CAPABILITIES: &'static [(&'static str, Permission)] =
				&[$( (stringify!($method), Permission::$permission) ),*];

			/// Evaluates every capability predicate for this checker.
			pub fn capabilities(&self) -> Vec<(&'static str, bool)> {
				Self::CAPABILITIES
					.iter()
					.map(|(name, permission)| (*name, self.has(*permission)))
					.collect()
			}
		}
	};
}

fn any_role_granted(roles: &[String], permission: Permission) -> bool {
	let registry = rbac();
	roles.iter().any(|role| registry.is_granted(role, permission))
}

// =============================================================================
// Service-level checker
// =============================================================================

/// Checker for the service-wide roles of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRolePermissionChecker {
	roles: Vec<String>,
}

impl ServiceRolePermissionChecker {
	pub fn new<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			roles: roles.into_iter().map(Into::into).collect(),
		}
	}

	pub fn roles(&self) -> &[String] {
		&self.roles
	}

	pub fn has(&self, permission: Permission) -> bool {
		any_role_granted(&self.roles, permission)
	}

	/// True when `service_admin` is one of the bound role names.
	///
	/// This matches on the role name rather than on any permission.
	pub fn is_service_admin(&self) -> bool {
		self.roles
			.iter()
			.any(|role| role == ServiceRole::ServiceAdmin.as_str())
	}
}

impl PermissionChecker for ServiceRolePermissionChecker {
	fn has(&self, permission: Permission) -> bool {
		ServiceRolePermissionChecker::has(self, permission)
	}
}

capabilities!(ServiceRolePermissionChecker {
	can_cycle_cookie_secrets => CYCLE_COOKIE_SECRET,
	can_update_user_account_statuses => UPDATE_USER_STATUS,
	can_read_users => READ_USER,
	can_search_users => SEARCH_USER,
	/// Service admins may update any household, not only their own.
	can_update_households => UPDATE_HOUSEHOLD,
	can_create_api_clients => CREATE_OAUTH2_CLIENTS,
	can_archive_api_clients => ARCHIVE_OAUTH2_CLIENTS,
	can_create_service_settings => CREATE_SERVICE_SETTINGS,
	can_archive_service_settings => ARCHIVE_SERVICE_SETTINGS,
	can_create_user_notifications => CREATE_USER_NOTIFICATIONS,
	/// Recipes are shared across households, so creating one is service-scoped.
	can_create_recipes => CREATE_RECIPES,
	can_create_valid_ingredients => CREATE_VALID_INGREDIENTS,
	can_update_valid_ingredients => UPDATE_VALID_INGREDIENTS,
	can_archive_valid_ingredients => ARCHIVE_VALID_INGREDIENTS,
	can_create_valid_instruments => CREATE_VALID_INSTRUMENTS,
	can_update_valid_instruments => UPDATE_VALID_INSTRUMENTS,
	can_archive_valid_instruments => ARCHIVE_VALID_INSTRUMENTS,
	can_create_valid_preparations => CREATE_VALID_PREPARATIONS,
	can_update_valid_preparations => UPDATE_VALID_PREPARATIONS,
	can_archive_valid_preparations => ARCHIVE_VALID_PREPARATIONS,
	can_create_valid_measurement_units => CREATE_VALID_MEASUREMENT_UNITS,
	can_update_valid_measurement_units => UPDATE_VALID_MEASUREMENT_UNITS,
	can_archive_valid_measurement_units => ARCHIVE_VALID_MEASUREMENT_UNITS,
	can_create_meal_plan_tasks => CREATE_MEAL_PLAN_TASKS,
});

// =============================================================================
// Household-level checker
// =============================================================================

/// Checker for a user's roles within one household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseholdRolePermissionChecker {
	roles: Vec<String>,
}

impl HouseholdRolePermissionChecker {
	pub fn new<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			roles: roles.into_iter().map(Into::into).collect(),
		}
	}

	pub fn roles(&self) -> &[String] {
		&self.roles
	}

	pub fn has(&self, permission: Permission) -> bool {
		any_role_granted(&self.roles, permission)
	}
}

impl PermissionChecker for HouseholdRolePermissionChecker {
	fn has(&self, permission: Permission) -> bool {
		HouseholdRolePermissionChecker::has(self, permission)
	}
}

capabilities!(HouseholdRolePermissionChecker {
	can_update_household => UPDATE_HOUSEHOLD,
	can_archive_household => ARCHIVE_HOUSEHOLD,
	can_invite_users_to_household => INVITE_USER_TO_HOUSEHOLD,
	can_remove_member_from_household => REMOVE_MEMBER_HOUSEHOLD,
	can_transfer_household_to_new_owner => TRANSFER_HOUSEHOLD,
	can_modify_member_permissions_for_household => MODIFY_MEMBER_PERMISSIONS_FOR_HOUSEHOLD,
	can_see_webhooks => READ_WEBHOOKS,
	can_create_webhooks => CREATE_WEBHOOKS,
	can_update_webhooks => UPDATE_WEBHOOKS,
	can_archive_webhooks => ARCHIVE_WEBHOOKS,
	can_create_webhook_trigger_events => CREATE_WEBHOOK_TRIGGER_EVENTS,
	can_archive_webhook_trigger_events => ARCHIVE_WEBHOOK_TRIGGER_EVENTS,
	can_see_audit_log_entries => READ_AUDIT_LOG_ENTRIES,
	can_see_api_clients => READ_OAUTH2_CLIENTS,
	can_see_meal_plans => READ_MEAL_PLANS,
	can_create_meal_plans => CREATE_MEAL_PLANS,
	can_update_meal_plans => UPDATE_MEAL_PLANS,
	can_archive_meal_plans => ARCHIVE_MEAL_PLANS,
	can_see_recipes => READ_RECIPES,
	can_search_recipes => SEARCH_RECIPES,
	can_update_recipes => UPDATE_RECIPES,
	can_archive_recipes => ARCHIVE_RECIPES,
	can_see_valid_ingredients => READ_VALID_INGREDIENTS,
	can_search_valid_ingredients => SEARCH_VALID_INGREDIENTS,
});
