// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP route handlers.
//!
//! Every handler follows the same sequence: require a session, authorize,
//! decode and validate the body, call the data manager, publish the data
//! change, encode the response.

pub mod health;
pub mod households;
pub mod invitations;
pub mod meal_plans;
pub mod recipes;
pub mod users;
pub mod valid_ingredients;
pub mod webhooks;

use larder_server_api::SearchQuery;
use larder_server_auth::{HouseholdId, HouseholdRolePermissionChecker, SessionContext};
use std::fmt::Display;
use std::str::FromStr;

use crate::api_response::ApiError;

/// Parses a path identifier. Malformed ids are invalid input.
pub(crate) fn parse_id<T>(field: &'static str, raw: &str) -> Result<T, ApiError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.parse().map_err(|e: T::Err| {
		tracing::debug!(field, error = %e, "malformed identifier");
		ApiError::invalid_input(format!("{field}: not a valid identifier"))
	})
}

/// Turns an authorization decision into a result, logging it.
pub(crate) fn authorize(
	session: &SessionContext,
	allowed: bool,
	capability: &'static str,
) -> Result<(), ApiError> {
	if allowed {
		tracing::debug!(user_id = %session.user_id(), capability, "capability check passed");
		Ok(())
	} else {
		tracing::info!(user_id = %session.user_id(), capability, "capability check failed");
		Err(ApiError::Forbidden)
	}
}

/// Requires `capability` on the caller's checker for `household_id`.
/// Non-members hold nothing.
pub(crate) fn household_capability(
	session: &SessionContext,
	household_id: HouseholdId,
	capability: &'static str,
	predicate: fn(&HouseholdRolePermissionChecker) -> bool,
) -> Result<(), ApiError> {
	let allowed = session
		.household_checker(household_id)
		.is_some_and(predicate);
	authorize(session, allowed, capability)
}

/// Requires `capability` in the active household and returns its id.
pub(crate) fn active_household_capability(
	session: &SessionContext,
	capability: &'static str,
	predicate: fn(&HouseholdRolePermissionChecker) -> bool,
) -> Result<HouseholdId, ApiError> {
	let (household_id, checker) = session.active_household_checker()?;
	authorize(session, predicate(checker), capability)?;
	Ok(household_id)
}

/// The active household, for routes already guarded by a permission filter.
pub(crate) fn active_household(session: &SessionContext) -> Result<HouseholdId, ApiError> {
	Ok(session.active_household_checker()?.0)
}

/// The trimmed `q` parameter of a search. Blank queries are invalid input.
pub(crate) fn search_term(query: &SearchQuery) -> Result<&str, ApiError> {
	let term = query.q.trim();
	if term.is_empty() {
		return Err(ApiError::invalid_input("q: is required"));
	}
	Ok(term)
}
