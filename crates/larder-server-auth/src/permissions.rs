// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The permission catalog.
//!
//! Every protected operation in Larder is named by a [`Permission`]: a stable,
//! printable-ASCII identifier such as `update.household`. The catalog is closed
//! at build time; [`Permission::from_id`] is the only way to turn an arbitrary
//! string back into a permission, and it rejects identifiers that are not in the
//! catalog.
//!
//! Identifiers show up in logs and audit records, so renaming one is a breaking
//! change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A single permission, compared by its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission(&'static str);

macro_rules! define_permissions {
	($( $name:ident = $id:literal ),* $(,)?) => {
		impl Permission {
			$( pub const $name: Permission = Permission($id); )*
		}

		static CATALOG: &[Permission] = &[$( Permission::$name ),*];
	};
}

define_permissions! {
	// Account and user administration
	CYCLE_COOKIE_SECRET = "update.cookie_secret",
	UPDATE_USER_STATUS = "update.user_status",
	READ_USER = "read.user",
	SEARCH_USER = "search.user",

	// Household administration
	UPDATE_HOUSEHOLD = "update.household",
	ARCHIVE_HOUSEHOLD = "archive.household",
	INVITE_USER_TO_HOUSEHOLD = "household.add.member",
	MODIFY_MEMBER_PERMISSIONS_FOR_HOUSEHOLD = "household.membership.modify",
	REMOVE_MEMBER_HOUSEHOLD = "remove_member.household",
	TRANSFER_HOUSEHOLD = "transfer.household",

	// Webhooks
	CREATE_WEBHOOKS = "create.webhooks",
	READ_WEBHOOKS = "read.webhooks",
	UPDATE_WEBHOOKS = "update.webhooks",
	ARCHIVE_WEBHOOKS = "archive.webhooks",
	CREATE_WEBHOOK_TRIGGER_EVENTS = "create.webhook_trigger_events",
	ARCHIVE_WEBHOOK_TRIGGER_EVENTS = "archive.webhook_trigger_events",

	// Audit log
	READ_AUDIT_LOG_ENTRIES = "read.audit_log_entries",

	// Reference data
	CREATE_VALID_INSTRUMENTS = "create.valid_instruments",
	READ_VALID_INSTRUMENTS = "read.valid_instruments",
	SEARCH_VALID_INSTRUMENTS = "search.valid_instruments",
	UPDATE_VALID_INSTRUMENTS = "update.valid_instruments",
	ARCHIVE_VALID_INSTRUMENTS = "archive.valid_instruments",
	CREATE_VALID_VESSELS = "create.valid_vessels",
	READ_VALID_VESSELS = "read.valid_vessels",
	SEARCH_VALID_VESSELS = "search.valid_vessels",
	UPDATE_VALID_VESSELS = "update.valid_vessels",
	ARCHIVE_VALID_VESSELS = "archive.valid_vessels",
	CREATE_VALID_INGREDIENTS = "create.valid_ingredients",
	READ_VALID_INGREDIENTS = "read.valid_ingredients",
	SEARCH_VALID_INGREDIENTS = "search.valid_ingredients",
	UPDATE_VALID_INGREDIENTS = "update.valid_ingredients",
	ARCHIVE_VALID_INGREDIENTS = "archive.valid_ingredients",
	CREATE_VALID_INGREDIENT_GROUPS = "create.valid_ingredient_groups",
	READ_VALID_INGREDIENT_GROUPS = "read.valid_ingredient_groups",
	SEARCH_VALID_INGREDIENT_GROUPS = "search.valid_ingredient_groups",
	UPDATE_VALID_INGREDIENT_GROUPS = "update.valid_ingredient_groups",
	ARCHIVE_VALID_INGREDIENT_GROUPS = "archive.valid_ingredient_groups",
	CREATE_VALID_PREPARATIONS = "create.valid_preparations",
	READ_VALID_PREPARATIONS = "read.valid_preparations",
	SEARCH_VALID_PREPARATIONS = "search.valid_preparations",
	UPDATE_VALID_PREPARATIONS = "update.valid_preparations",
	ARCHIVE_VALID_PREPARATIONS = "archive.valid_preparations",
	CREATE_VALID_MEASUREMENT_UNITS = "create.measurement_units",
	READ_VALID_MEASUREMENT_UNITS = "read.measurement_units",
	SEARCH_VALID_MEASUREMENT_UNITS = "search.measurement_units",
	UPDATE_VALID_MEASUREMENT_UNITS = "update.measurement_units",
	ARCHIVE_VALID_MEASUREMENT_UNITS = "archive.measurement_units",
	CREATE_VALID_INGREDIENT_STATES = "create.valid_ingredient_states",
	READ_VALID_INGREDIENT_STATES = "read.valid_ingredient_states",
	UPDATE_VALID_INGREDIENT_STATES = "update.valid_ingredient_states",
	ARCHIVE_VALID_INGREDIENT_STATES = "archive.valid_ingredient_states",
	CREATE_VALID_MEASUREMENT_UNIT_CONVERSIONS = "create.measurement_conversions",
	READ_VALID_MEASUREMENT_UNIT_CONVERSIONS = "read.measurement_conversions",
	UPDATE_VALID_MEASUREMENT_UNIT_CONVERSIONS = "update.measurement_conversions",
	ARCHIVE_VALID_MEASUREMENT_UNIT_CONVERSIONS = "archive.measurement_conversions",
	CREATE_VALID_INGREDIENT_PREPARATIONS = "create.valid_ingredient_preparations",
	READ_VALID_INGREDIENT_PREPARATIONS = "read.valid_ingredient_preparations",
	SEARCH_VALID_INGREDIENT_PREPARATIONS = "search.valid_ingredient_preparations",
	UPDATE_VALID_INGREDIENT_PREPARATIONS = "update.valid_ingredient_preparations",
	ARCHIVE_VALID_INGREDIENT_PREPARATIONS = "archive.valid_ingredient_preparations",
	CREATE_VALID_INGREDIENT_STATE_INGREDIENTS = "create.valid_ingredient_state_ingredients",
	READ_VALID_INGREDIENT_STATE_INGREDIENTS = "read.valid_ingredient_state_ingredients",
	SEARCH_VALID_INGREDIENT_STATE_INGREDIENTS = "search.valid_ingredient_state_ingredients",
	UPDATE_VALID_INGREDIENT_STATE_INGREDIENTS = "update.valid_ingredient_state_ingredients",
	ARCHIVE_VALID_INGREDIENT_STATE_INGREDIENTS = "archive.valid_ingredient_state_ingredients",
	CREATE_VALID_PREPARATION_INSTRUMENTS = "create.valid_preparation_instruments",
	READ_VALID_PREPARATION_INSTRUMENTS = "read.valid_preparation_instruments",
	SEARCH_VALID_PREPARATION_INSTRUMENTS = "search.valid_preparation_instruments",
	UPDATE_VALID_PREPARATION_INSTRUMENTS = "update.valid_preparation_instruments",
	ARCHIVE_VALID_PREPARATION_INSTRUMENTS = "archive.valid_preparation_instruments",
	CREATE_VALID_PREPARATION_VESSELS = "create.valid_preparation_vessels",
	READ_VALID_PREPARATION_VESSELS = "read.valid_preparation_vessels",
	SEARCH_VALID_PREPARATION_VESSELS = "search.valid_preparation_vessels",
	UPDATE_VALID_PREPARATION_VESSELS = "update.valid_preparation_vessels",
	ARCHIVE_VALID_PREPARATION_VESSELS = "archive.valid_preparation_vessels",
	CREATE_VALID_INGREDIENT_MEASUREMENT_UNITS = "create.valid_ingredient_measurement_units",
	READ_VALID_INGREDIENT_MEASUREMENT_UNITS = "read.valid_ingredient_measurement_units",
	SEARCH_VALID_INGREDIENT_MEASUREMENT_UNITS = "search.valid_ingredient_measurement_units",
	UPDATE_VALID_INGREDIENT_MEASUREMENT_UNITS = "update.valid_ingredient_measurement_units",
	ARCHIVE_VALID_INGREDIENT_MEASUREMENT_UNITS = "archive.valid_ingredient_measurement_units",

	// Meals and recipes
	CREATE_MEALS = "create.meals",
	READ_MEALS = "read.meals",
	UPDATE_MEALS = "update.meals",
	ARCHIVE_MEALS = "archive.meals",
	CREATE_RECIPES = "create.recipes",
	READ_RECIPES = "read.recipes",
	SEARCH_RECIPES = "search.recipes",
	UPDATE_RECIPES = "update.recipes",
	ARCHIVE_RECIPES = "archive.recipes",
	CREATE_RECIPE_PREP_TASKS = "create.recipe_prep_tasks",
	READ_RECIPE_PREP_TASKS = "read.recipe_prep_tasks",
	UPDATE_RECIPE_PREP_TASKS = "update.recipe_prep_tasks",
	ARCHIVE_RECIPE_PREP_TASKS = "archive.recipe_prep_tasks",
	CREATE_RECIPE_STEPS = "create.recipe_steps",
	READ_RECIPE_STEPS = "read.recipe_steps",
	SEARCH_RECIPE_STEPS = "search.recipe_steps",
	UPDATE_RECIPE_STEPS = "update.recipe_steps",
	ARCHIVE_RECIPE_STEPS = "archive.recipe_steps",
	CREATE_RECIPE_STEP_INSTRUMENTS = "create.recipe_step_instruments",
	READ_RECIPE_STEP_INSTRUMENTS = "read.recipe_step_instruments",
	SEARCH_RECIPE_STEP_INSTRUMENTS = "search.recipe_step_instruments",
	UPDATE_RECIPE_STEP_INSTRUMENTS = "update.recipe_step_instruments",
	ARCHIVE_RECIPE_STEP_INSTRUMENTS = "archive.recipe_step_instruments",
	CREATE_RECIPE_STEP_VESSELS = "create.recipe_step_vessels",
	READ_RECIPE_STEP_VESSELS = "read.recipe_step_vessels",
	SEARCH_RECIPE_STEP_VESSELS = "search.recipe_step_vessels",
	UPDATE_RECIPE_STEP_VESSELS = "update.recipe_step_vessels",
	ARCHIVE_RECIPE_STEP_VESSELS = "archive.recipe_step_vessels",
	CREATE_RECIPE_STEP_INGREDIENTS = "create.recipe_step_ingredients",
	READ_RECIPE_STEP_INGREDIENTS = "read.recipe_step_ingredients",
	SEARCH_RECIPE_STEP_INGREDIENTS = "search.recipe_step_ingredients",
	UPDATE_RECIPE_STEP_INGREDIENTS = "update.recipe_step_ingredients",
	ARCHIVE_RECIPE_STEP_INGREDIENTS = "archive.recipe_step_ingredients",
	CREATE_RECIPE_STEP_COMPLETION_CONDITIONS = "create.recipe_step_completion_conditions",
	READ_RECIPE_STEP_COMPLETION_CONDITIONS = "read.recipe_step_completion_conditions",
	SEARCH_RECIPE_STEP_COMPLETION_CONDITIONS = "search.recipe_step_completion_conditions",
	UPDATE_RECIPE_STEP_COMPLETION_CONDITIONS = "update.recipe_step_completion_conditions",
	ARCHIVE_RECIPE_STEP_COMPLETION_CONDITIONS = "archive.recipe_step_completion_conditions",
	CREATE_RECIPE_STEP_PRODUCTS = "create.recipe_step_products",
	READ_RECIPE_STEP_PRODUCTS = "read.recipe_step_products",
	SEARCH_RECIPE_STEP_PRODUCTS = "search.recipe_step_products",
	UPDATE_RECIPE_STEP_PRODUCTS = "update.recipe_step_products",
	ARCHIVE_RECIPE_STEP_PRODUCTS = "archive.recipe_step_products",

	// Meal planning
	CREATE_MEAL_PLANS = "create.meal_plans",
	READ_MEAL_PLANS = "read.meal_plans",
	SEARCH_MEAL_PLANS = "search.meal_plans",
	UPDATE_MEAL_PLANS = "update.meal_plans",
	ARCHIVE_MEAL_PLANS = "archive.meal_plans",
	CREATE_MEAL_PLAN_EVENTS = "create.meal_plan_events",
	READ_MEAL_PLAN_EVENTS = "read.meal_plan_events",
	UPDATE_MEAL_PLAN_EVENTS = "update.meal_plan_events",
	ARCHIVE_MEAL_PLAN_EVENTS = "archive.meal_plan_events",
	CREATE_MEAL_PLAN_OPTIONS = "create.meal_plan_options",
	READ_MEAL_PLAN_OPTIONS = "read.meal_plan_options",
	SEARCH_MEAL_PLAN_OPTIONS = "search.meal_plan_options",
	UPDATE_MEAL_PLAN_OPTIONS = "update.meal_plan_options",
	ARCHIVE_MEAL_PLAN_OPTIONS = "archive.meal_plan_options",
	CREATE_MEAL_PLAN_GROCERY_LIST_ITEMS = "create.meal_plan_grocery_list_items",
	READ_MEAL_PLAN_GROCERY_LIST_ITEMS = "read.meal_plan_grocery_list_items",
	UPDATE_MEAL_PLAN_GROCERY_LIST_ITEMS = "update.meal_plan_grocery_list_items",
	ARCHIVE_MEAL_PLAN_GROCERY_LIST_ITEMS = "archive.meal_plan_grocery_list_items",
	CREATE_MEAL_PLAN_OPTION_VOTES = "create.meal_plan_option_votes",
	READ_MEAL_PLAN_OPTION_VOTES = "read.meal_plan_option_votes",
	SEARCH_MEAL_PLAN_OPTION_VOTES = "search.meal_plan_option_votes",
	UPDATE_MEAL_PLAN_OPTION_VOTES = "update.meal_plan_option_votes",
	ARCHIVE_MEAL_PLAN_OPTION_VOTES = "archive.meal_plan_option_votes",
	READ_MEAL_PLAN_TASKS = "read.meal_plan_tasks",
	CREATE_MEAL_PLAN_TASKS = "create.meal_plan_tasks",
	UPDATE_MEAL_PLAN_TASKS = "update.meal_plan_tasks",

	// Service settings
	CREATE_SERVICE_SETTINGS = "create.service_settings",
	READ_SERVICE_SETTINGS = "read.service_settings",
	SEARCH_SERVICE_SETTINGS = "search.service_settings",
	ARCHIVE_SERVICE_SETTINGS = "archive.service_settings",
	CREATE_SERVICE_SETTING_CONFIGURATIONS = "create.service_setting_configurations",
	READ_SERVICE_SETTING_CONFIGURATIONS = "read.service_setting_configurations",
	UPDATE_SERVICE_SETTING_CONFIGURATIONS = "update.service_setting_configurations",
	ARCHIVE_SERVICE_SETTING_CONFIGURATIONS = "archive.service_setting_configurations",

	// Preferences, ownership and ratings
	CREATE_USER_INGREDIENT_PREFERENCES = "create.user_ingredient_preferences",
	READ_USER_INGREDIENT_PREFERENCES = "read.user_ingredient_preferences",
	UPDATE_USER_INGREDIENT_PREFERENCES = "update.user_ingredient_preferences",
	ARCHIVE_USER_INGREDIENT_PREFERENCES = "archive.user_ingredient_preferences",
	CREATE_HOUSEHOLD_INSTRUMENT_OWNERSHIPS = "create.household_instrument_ownerships",
	READ_HOUSEHOLD_INSTRUMENT_OWNERSHIPS = "read.household_instrument_ownerships",
	UPDATE_HOUSEHOLD_INSTRUMENT_OWNERSHIPS = "update.household_instrument_ownerships",
	ARCHIVE_HOUSEHOLD_INSTRUMENT_OWNERSHIPS = "archive.household_instrument_ownerships",
	CREATE_RECIPE_RATINGS = "create.recipe_ratings",
	READ_RECIPE_RATINGS = "read.recipe_ratings",
	UPDATE_RECIPE_RATINGS = "update.recipe_ratings",
	ARCHIVE_RECIPE_RATINGS = "archive.recipe_ratings",

	// API clients
	CREATE_OAUTH2_CLIENTS = "create.oauth2_clients",
	READ_OAUTH2_CLIENTS = "read.oauth2_clients",
	ARCHIVE_OAUTH2_CLIENTS = "archive.oauth2_clients",

	// Notifications
	CREATE_USER_NOTIFICATIONS = "create.user_notifications",
	READ_USER_NOTIFICATIONS = "read.user_notifications",
	UPDATE_USER_NOTIFICATIONS = "update.user_notifications",
}

static BY_ID: LazyLock<HashMap<&'static str, Permission>> =
	LazyLock::new(|| CATALOG.iter().map(|p| (p.0, *p)).collect());

impl Permission {
	/// The stable identifier string.
	pub const fn id(&self) -> &'static str {
		self.0
	}

	/// Every permission in the catalog, in declaration order.
	pub fn all() -> &'static [Permission] {
		CATALOG
	}

	/// Looks up a permission by identifier.
	///
	/// Returns `None` for identifiers outside the catalog.
	pub fn from_id(id: &str) -> Option<Permission> {
		BY_ID.get(id).copied()
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// Error returned when an identifier is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
	type Err = UnknownPermission;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Permission::from_id(s).ok_or_else(|| UnknownPermission(s.to_string()))
	}
}

impl Serialize for Permission {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.0)
	}
}

impl<'de> Deserialize<'de> for Permission {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let id = String::deserialize(deserializer)?;
		id.parse().map_err(serde::de::Error::custom)
	}
}
