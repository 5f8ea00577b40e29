// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request session context.
//!
//! A [`SessionContext`] is produced by the authentication step and carries
//! everything a handler needs to make authorization decisions: the requester,
//! their service-level checker, the active household and one household-level
//! checker per membership. Checkers are built up front, so reading them
//! performs no RBAC query.

use crate::checker::{HouseholdRolePermissionChecker, ServiceRolePermissionChecker};
use crate::permissions::Permission;
use crate::types::{AccountStatus, HouseholdId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	#[error("no session attached to request")]
	Missing,

	#[error("session has no active household")]
	NoActiveHousehold,

	#[error("requester is not a member of active household {0}")]
	NotAMember(HouseholdId),
}

/// Identity and standing of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterInfo {
	pub user_id: UserId,
	pub account_status: AccountStatus,
	#[serde(default)]
	pub account_status_explanation: String,
	pub service_permissions: ServiceRolePermissionChecker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
	pub requester: RequesterInfo,
	pub active_household_id: Option<HouseholdId>,
	#[serde(default)]
	pub household_permissions: HashMap<HouseholdId, HouseholdRolePermissionChecker>,
}

impl SessionContext {
	/// Creates a context for `user_id` holding the given service roles and no
	/// household memberships.
	pub fn new<I, S>(user_id: UserId, service_roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			requester: RequesterInfo {
				user_id,
				account_status: AccountStatus::Good,
				account_status_explanation: String::new(),
				service_permissions: ServiceRolePermissionChecker::new(service_roles),
			},
			active_household_id: None,
			household_permissions: HashMap::new(),
		}
	}

	/// Adds a household membership with the given household roles.
	pub fn with_household<I, S>(mut self, household_id: HouseholdId, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.household_permissions
			.insert(household_id, HouseholdRolePermissionChecker::new(roles));
		self
	}

	pub fn with_active_household(mut self, household_id: HouseholdId) -> Self {
		self.active_household_id = Some(household_id);
		self
	}

	pub fn with_account_status(mut self, status: AccountStatus) -> Self {
		self.requester.account_status = status;
		self
	}

	pub fn user_id(&self) -> UserId {
		self.requester.user_id
	}

	pub fn service_checker(&self) -> &ServiceRolePermissionChecker {
		&self.requester.service_permissions
	}

	/// The checker for `household_id`, if the requester belongs to it.
	pub fn household_checker(
		&self,
		household_id: HouseholdId,
	) -> Option<&HouseholdRolePermissionChecker> {
		self.household_permissions.get(&household_id)
	}

	/// The active household and its checker.
	///
	/// An active household id that has no checker is treated as a failure, never
	/// as an empty grant that could later be widened.
	pub fn active_household_checker(
		&self,
	) -> Result<(HouseholdId, &HouseholdRolePermissionChecker), SessionError> {
		let household_id = self
			.active_household_id
			.ok_or(SessionError::NoActiveHousehold)?;
		let checker = self
			.household_checker(household_id)
			.ok_or(SessionError::NotAMember(household_id))?;
		Ok((household_id, checker))
	}

	/// True if either the service checker or the active household checker
	/// holds `permission`.
	pub fn has_permission(&self, permission: Permission) -> bool {
		if self.service_checker().has(permission) {
			return true;
		}
		self.active_household_checker()
			.map(|(_, checker)| checker.has(permission))
			.unwrap_or(false)
	}
}
