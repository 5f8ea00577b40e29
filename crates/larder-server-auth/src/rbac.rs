// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role registry and RBAC engine.
//!
//! Roles own a set of directly-assigned permissions and may name a single
//! parent. A role is granted a permission when the permission is in its own
//! direct set or in the direct set of any ancestor.
//!
//! The process-wide registry is built once by [`init`] (or lazily on the first
//! call to [`rbac`]) and never mutated afterwards, so lookups need no locking.
//!
//! ```text
//! service_user          (no permissions)
//! service_admin    ──▶  household_admin  ──▶  household_member
//! ```

use crate::permissions::Permission;
use crate::types::{HouseholdRole, ServiceRole};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
	#[error("role '{0}' is already registered")]
	DuplicateRole(String),

	#[error("role '{0}' is not registered")]
	UnknownRole(String),

	#[error("role '{child}' already inherits from '{parent}'")]
	ParentAlreadySet { child: String, parent: String },

	#[error("making '{parent}' the parent of '{child}' would create a cycle")]
	Cycle { child: String, parent: String },
}

/// A named bundle of directly-assigned permissions.
#[derive(Debug, Clone)]
pub struct Role {
	name: String,
	permissions: HashSet<Permission>,
	parent: Option<String>,
}

impl Role {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The parent role name, if this role inherits from one.
	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	/// Permissions assigned to this role directly, excluding inherited ones.
	pub fn direct_permissions(&self) -> &HashSet<Permission> {
		&self.permissions
	}
}

#[derive(Debug, Default)]
pub struct RoleRegistry {
	roles: HashMap<String, Role>,
}

impl RoleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a role with its direct permissions.
	pub fn register(
		&mut self,
		name: impl Into<String>,
		permissions: impl IntoIterator<Item = Permission>,
	) -> Result<(), RbacError> {
		let name = name.into();
		if self.roles.contains_key(&name) {
			return Err(RbacError::DuplicateRole(name));
		}
		let role = Role {
			name: name.clone(),
			permissions: permissions.into_iter().collect(),
			parent: None,
		};
		self.roles.insert(name, role);
		Ok(())
	}

	/// Records that `child` inherits every permission of `parent`.
	pub fn set_parent(&mut self, child: &str, parent: &str) -> Result<(), RbacError> {
		if !self.roles.contains_key(parent) {
			return Err(RbacError::UnknownRole(parent.to_string()));
		}
		let existing = match self.roles.get(child) {
			Some(role) => role.parent.clone(),
			None => return Err(RbacError::UnknownRole(child.to_string())),
		};
		if let Some(existing) = existing {
			return Err(RbacError::ParentAlreadySet {
				child: child.to_string(),
				parent: existing,
			});
		}
		if self.ancestry(parent).any(|ancestor| ancestor.name == child) {
			return Err(RbacError::Cycle {
				child: child.to_string(),
				parent: parent.to_string(),
			});
		}

		if let Some(role) = self.roles.get_mut(child) {
			role.parent = Some(parent.to_string());
		}
		Ok(())
	}

	pub fn role(&self, name: &str) -> Option<&Role> {
		self.roles.get(name)
	}

	/// Returns true iff `role` or one of its ancestors directly holds `permission`.
	///
	/// Unknown roles hold nothing.
	pub fn is_granted(&self, role: &str, permission: Permission) -> bool {
		self.ancestry(role)
			.any(|ancestor| ancestor.permissions.contains(&permission))
	}

	/// Every permission held by `role`, direct or inherited.
	pub fn effective_permissions(&self, role: &str) -> HashSet<Permission> {
		self.ancestry(role)
			.flat_map(|ancestor| ancestor.permissions.iter().copied())
			.collect()
	}

	/// Walks from `role` up the parent chain, starting with `role` itself.
	///
	/// The walk is bounded by the number of registered roles, so it terminates
	/// even on a registry that was assembled without going through `set_parent`.
	fn ancestry<'a>(&'a self, role: &str) -> impl Iterator<Item = &'a Role> + 'a {
		let mut next = self.roles.get(role);
		let mut remaining = self.roles.len();
		std::iter::from_fn(move || {
			if remaining == 0 {
				return None;
			}
			remaining -= 1;
			let current = next?;
			next = current
				.parent
				.as_deref()
				.and_then(|parent| self.roles.get(parent));
			Some(current)
		})
	}

	/// Builds the registry the server runs with.
	pub fn seeded() -> Result<Self, RbacError> {
		let mut registry = Self::new();
		registry.register(ServiceRole::ServiceUser.as_str(), std::iter::empty())?;
		registry.register(
			ServiceRole::ServiceAdmin.as_str(),
			SERVICE_ADMIN_PERMISSIONS.iter().copied(),
		)?;
		registry.register(
			HouseholdRole::HouseholdAdmin.as_str(),
			HOUSEHOLD_ADMIN_PERMISSIONS.iter().copied(),
		)?;
		registry.register(
			HouseholdRole::HouseholdMember.as_str(),
			HOUSEHOLD_MEMBER_PERMISSIONS.iter().copied(),
		)?;

		registry.set_parent(
			HouseholdRole::HouseholdAdmin.as_str(),
			HouseholdRole::HouseholdMember.as_str(),
		)?;
		registry.set_parent(
			ServiceRole::ServiceAdmin.as_str(),
			HouseholdRole::HouseholdAdmin.as_str(),
		)?;
		Ok(registry)
	}
}

static RBAC: LazyLock<RoleRegistry> = LazyLock::new(|| {
	RoleRegistry::seeded().expect("built-in role registry must be consistent")
});

/// The process-wide role registry.
///
/// # Panics
///
/// Panics on first use if the built-in roles cannot be registered.
pub fn rbac() -> &'static RoleRegistry {
	&RBAC
}

/// Forces construction of the process-wide registry.
///
/// Called during startup so a broken registry aborts the process before any
/// request is accepted.
pub fn init() {
	let registry = LazyLock::force(&RBAC);
	tracing::debug!(roles = registry.roles.len(), "role registry initialized");
}

pub const SERVICE_ADMIN_PERMISSIONS: &[Permission] = &[
	Permission::CYCLE_COOKIE_SECRET,
	Permission::UPDATE_USER_STATUS,
	Permission::READ_USER,
	Permission::SEARCH_USER,
	Permission::CREATE_OAUTH2_CLIENTS,
	Permission::ARCHIVE_OAUTH2_CLIENTS,
	Permission::ARCHIVE_SERVICE_SETTINGS,
	Permission::CREATE_RECIPES,
	Permission::CREATE_VALID_INSTRUMENTS,
	Permission::UPDATE_VALID_INSTRUMENTS,
	Permission::ARCHIVE_VALID_INSTRUMENTS,
	Permission::CREATE_VALID_VESSELS,
	Permission::UPDATE_VALID_VESSELS,
	Permission::ARCHIVE_VALID_VESSELS,
	Permission::CREATE_VALID_INGREDIENTS,
	Permission::UPDATE_VALID_INGREDIENTS,
	Permission::ARCHIVE_VALID_INGREDIENTS,
	Permission::CREATE_VALID_INGREDIENT_GROUPS,
	Permission::UPDATE_VALID_INGREDIENT_GROUPS,
	Permission::ARCHIVE_VALID_INGREDIENT_GROUPS,
	Permission::CREATE_VALID_PREPARATIONS,
	Permission::UPDATE_VALID_PREPARATIONS,
	Permission::ARCHIVE_VALID_PREPARATIONS,
	Permission::CREATE_VALID_MEASUREMENT_UNITS,
	Permission::UPDATE_VALID_MEASUREMENT_UNITS,
	Permission::ARCHIVE_VALID_MEASUREMENT_UNITS,
	Permission::CREATE_VALID_MEASUREMENT_UNIT_CONVERSIONS,
	Permission::UPDATE_VALID_MEASUREMENT_UNIT_CONVERSIONS,
	Permission::ARCHIVE_VALID_MEASUREMENT_UNIT_CONVERSIONS,
	Permission::CREATE_VALID_INGREDIENT_PREPARATIONS,
	Permission::UPDATE_VALID_INGREDIENT_PREPARATIONS,
	Permission::ARCHIVE_VALID_INGREDIENT_PREPARATIONS,
	Permission::CREATE_VALID_INGREDIENT_STATE_INGREDIENTS,
	Permission::UPDATE_VALID_INGREDIENT_STATE_INGREDIENTS,
	Permission::ARCHIVE_VALID_INGREDIENT_STATE_INGREDIENTS,
	Permission::CREATE_VALID_PREPARATION_INSTRUMENTS,
	Permission::UPDATE_VALID_PREPARATION_INSTRUMENTS,
	Permission::ARCHIVE_VALID_PREPARATION_INSTRUMENTS,
	Permission::CREATE_VALID_PREPARATION_VESSELS,
	Permission::UPDATE_VALID_PREPARATION_VESSELS,
	Permission::ARCHIVE_VALID_PREPARATION_VESSELS,
	Permission::CREATE_VALID_INGREDIENT_MEASUREMENT_UNITS,
	Permission::UPDATE_VALID_INGREDIENT_MEASUREMENT_UNITS,
	Permission::ARCHIVE_VALID_INGREDIENT_MEASUREMENT_UNITS,
	Permission::CREATE_VALID_INGREDIENT_STATES,
	Permission::UPDATE_VALID_INGREDIENT_STATES,
	Permission::ARCHIVE_VALID_INGREDIENT_STATES,
	Permission::CREATE_USER_NOTIFICATIONS,
	Permission::CREATE_SERVICE_SETTINGS,
	Permission::CREATE_MEAL_PLAN_TASKS,
	Permission::CREATE_MEAL_PLAN_GROCERY_LIST_ITEMS,
];

pub const HOUSEHOLD_ADMIN_PERMISSIONS: &[Permission] = &[
	Permission::UPDATE_HOUSEHOLD,
	Permission::ARCHIVE_HOUSEHOLD,
	Permission::TRANSFER_HOUSEHOLD,
	Permission::INVITE_USER_TO_HOUSEHOLD,
	Permission::MODIFY_MEMBER_PERMISSIONS_FOR_HOUSEHOLD,
	Permission::REMOVE_MEMBER_HOUSEHOLD,
	Permission::CREATE_WEBHOOKS,
	Permission::UPDATE_WEBHOOKS,
	Permission::ARCHIVE_WEBHOOKS,
	Permission::CREATE_MEAL_PLANS,
	Permission::UPDATE_MEAL_PLANS,
	Permission::ARCHIVE_MEAL_PLANS,
	Permission::CREATE_MEAL_PLAN_EVENTS,
	Permission::UPDATE_MEAL_PLAN_EVENTS,
	Permission::ARCHIVE_MEAL_PLAN_EVENTS,
	Permission::CREATE_MEAL_PLAN_OPTIONS,
	Permission::UPDATE_MEAL_PLAN_OPTIONS,
	Permission::ARCHIVE_MEAL_PLAN_OPTIONS,
	Permission::CREATE_HOUSEHOLD_INSTRUMENT_OWNERSHIPS,
	Permission::UPDATE_HOUSEHOLD_INSTRUMENT_OWNERSHIPS,
	Permission::ARCHIVE_HOUSEHOLD_INSTRUMENT_OWNERSHIPS,
	Permission::CREATE_WEBHOOK_TRIGGER_EVENTS,
	Permission::ARCHIVE_WEBHOOK_TRIGGER_EVENTS,
];

pub const HOUSEHOLD_MEMBER_PERMISSIONS: &[Permission] = &[
	Permission::READ_WEBHOOKS,
	Permission::READ_AUDIT_LOG_ENTRIES,
	Permission::READ_OAUTH2_CLIENTS,
	Permission::READ_SERVICE_SETTINGS,
	Permission::SEARCH_SERVICE_SETTINGS,
	Permission::CREATE_MEALS,
	Permission::READ_MEALS,
	Permission::UPDATE_MEALS,
	Permission::ARCHIVE_MEALS,
	Permission::READ_RECIPES,
	Permission::SEARCH_RECIPES,
	Permission::UPDATE_RECIPES,
	Permission::ARCHIVE_RECIPES,
	Permission::CREATE_RECIPE_STEPS,
	Permission::READ_RECIPE_STEPS,
	Permission::SEARCH_RECIPE_STEPS,
	Permission::UPDATE_RECIPE_STEPS,
	Permission::ARCHIVE_RECIPE_STEPS,
	Permission::CREATE_RECIPE_PREP_TASKS,
	Permission::READ_RECIPE_PREP_TASKS,
	Permission::UPDATE_RECIPE_PREP_TASKS,
	Permission::ARCHIVE_RECIPE_PREP_TASKS,
	Permission::CREATE_RECIPE_STEP_INSTRUMENTS,
	Permission::READ_RECIPE_STEP_INSTRUMENTS,
	Permission::SEARCH_RECIPE_STEP_INSTRUMENTS,
	Permission::UPDATE_RECIPE_STEP_INSTRUMENTS,
	Permission::ARCHIVE_RECIPE_STEP_INSTRUMENTS,
	Permission::CREATE_RECIPE_STEP_VESSELS,
	Permission::READ_RECIPE_STEP_VESSELS,
	Permission::SEARCH_RECIPE_STEP_VESSELS,
	Permission::UPDATE_RECIPE_STEP_VESSELS,
	Permission::ARCHIVE_RECIPE_STEP_VESSELS,
	Permission::CREATE_RECIPE_STEP_INGREDIENTS,
	Permission::READ_RECIPE_STEP_INGREDIENTS,
	Permission::SEARCH_RECIPE_STEP_INGREDIENTS,
	Permission::UPDATE_RECIPE_STEP_INGREDIENTS,
	Permission::ARCHIVE_RECIPE_STEP_INGREDIENTS,
	Permission::CREATE_RECIPE_STEP_COMPLETION_CONDITIONS,
	Permission::READ_RECIPE_STEP_COMPLETION_CONDITIONS,
	Permission::SEARCH_RECIPE_STEP_COMPLETION_CONDITIONS,
	Permission::UPDATE_RECIPE_STEP_COMPLETION_CONDITIONS,
	Permission::ARCHIVE_RECIPE_STEP_COMPLETION_CONDITIONS,
	Permission::CREATE_RECIPE_STEP_PRODUCTS,
	Permission::READ_RECIPE_STEP_PRODUCTS,
	Permission::SEARCH_RECIPE_STEP_PRODUCTS,
	Permission::UPDATE_RECIPE_STEP_PRODUCTS,
	Permission::ARCHIVE_RECIPE_STEP_PRODUCTS,
	Permission::READ_VALID_INSTRUMENTS,
	Permission::SEARCH_VALID_INSTRUMENTS,
	Permission::READ_VALID_VESSELS,
	Permission::SEARCH_VALID_VESSELS,
	Permission::READ_VALID_INGREDIENTS,
	Permission::SEARCH_VALID_INGREDIENTS,
	Permission::READ_VALID_INGREDIENT_GROUPS,
	Permission::SEARCH_VALID_INGREDIENT_GROUPS,
	Permission::READ_VALID_PREPARATIONS,
	Permission::SEARCH_VALID_PREPARATIONS,
	Permission::READ_VALID_MEASUREMENT_UNITS,
	Permission::SEARCH_VALID_MEASUREMENT_UNITS,
	Permission::READ_VALID_MEASUREMENT_UNIT_CONVERSIONS,
	Permission::READ_VALID_INGREDIENT_PREPARATIONS,
	Permission::SEARCH_VALID_INGREDIENT_PREPARATIONS,
	Permission::READ_VALID_INGREDIENT_STATE_INGREDIENTS,
	Permission::SEARCH_VALID_INGREDIENT_STATE_INGREDIENTS,
	Permission::READ_VALID_PREPARATION_INSTRUMENTS,
	Permission::SEARCH_VALID_PREPARATION_INSTRUMENTS,
	Permission::READ_VALID_PREPARATION_VESSELS,
	Permission::SEARCH_VALID_PREPARATION_VESSELS,
	Permission::READ_VALID_INGREDIENT_MEASUREMENT_UNITS,
	Permission::SEARCH_VALID_INGREDIENT_MEASUREMENT_UNITS,
	Permission::READ_MEAL_PLANS,
	Permission::SEARCH_MEAL_PLANS,
	Permission::READ_MEAL_PLAN_EVENTS,
	Permission::READ_MEAL_PLAN_OPTIONS,
	Permission::SEARCH_MEAL_PLAN_OPTIONS,
	Permission::READ_VALID_INGREDIENT_STATES,
	Permission::READ_MEAL_PLAN_GROCERY_LIST_ITEMS,
	Permission::UPDATE_MEAL_PLAN_GROCERY_LIST_ITEMS,
	Permission::ARCHIVE_MEAL_PLAN_GROCERY_LIST_ITEMS,
	Permission::CREATE_MEAL_PLAN_OPTION_VOTES,
	Permission::READ_MEAL_PLAN_OPTION_VOTES,
	Permission::SEARCH_MEAL_PLAN_OPTION_VOTES,
	Permission::UPDATE_MEAL_PLAN_OPTION_VOTES,
	Permission::ARCHIVE_MEAL_PLAN_OPTION_VOTES,
	Permission::CREATE_SERVICE_SETTING_CONFIGURATIONS,
	Permission::READ_SERVICE_SETTING_CONFIGURATIONS,
	Permission::UPDATE_SERVICE_SETTING_CONFIGURATIONS,
	Permission::ARCHIVE_SERVICE_SETTING_CONFIGURATIONS,
	Permission::READ_MEAL_PLAN_TASKS,
	Permission::UPDATE_MEAL_PLAN_TASKS,
	Permission::CREATE_USER_INGREDIENT_PREFERENCES,
	Permission::READ_USER_INGREDIENT_PREFERENCES,
	Permission::UPDATE_USER_INGREDIENT_PREFERENCES,
	Permission::ARCHIVE_USER_INGREDIENT_PREFERENCES,
	Permission::READ_HOUSEHOLD_INSTRUMENT_OWNERSHIPS,
	Permission::CREATE_RECIPE_RATINGS,
	Permission::READ_RECIPE_RATINGS,
	Permission::UPDATE_RECIPE_RATINGS,
	Permission::ARCHIVE_RECIPE_RATINGS,
	Permission::READ_USER_NOTIFICATIONS,
	Permission::UPDATE_USER_NOTIFICATIONS,
];
