// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Meal plan HTTP handlers, scoped to the caller's active household.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{ListResponse, MealPlanCreationRequest, MealPlanUpdateRequest, PageQuery};
use larder_server_auth::{HouseholdRolePermissionChecker, MealPlanId};
use larder_server_events::{DataChangeMessage, EventType};
use tracing::instrument;

use super::{active_household_capability, parse_id};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_meal_plans(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let household_id = active_household_capability(
		&session,
		"can_see_meal_plans",
		HouseholdRolePermissionChecker::can_see_meal_plans,
	)?;
	let filter = query.filter();
	let meal_plans = state
		.meal_plans
		.list_meal_plans(&cancel, household_id, &filter)
		.await?;
	Ok(negotiated.ok(&ListResponse::new(meal_plans, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn create_meal_plan(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Decoded(body): Decoded<MealPlanCreationRequest>,
) -> Result<Response, ApiError> {
	let household_id = active_household_capability(
		&session,
		"can_create_meal_plans",
		HouseholdRolePermissionChecker::can_create_meal_plans,
	)?;
	body.validate()?;

	let meal_plan = body.into_meal_plan(household_id, session.user_id());
	state.meal_plans.create_meal_plan(&cancel, &meal_plan).await?;
	tracing::info!(meal_plan_id = %meal_plan.id, %household_id, "meal plan created");

	state.events.publish(
		DataChangeMessage::new(EventType::MealPlanCreated, session.user_id())
			.household(household_id)
			.entity(&meal_plan),
	);
	Ok(negotiated.created(&meal_plan))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), meal_plan_id = %meal_plan_id))]
pub async fn get_meal_plan(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(meal_plan_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id = active_household_capability(
		&session,
		"can_see_meal_plans",
		HouseholdRolePermissionChecker::can_see_meal_plans,
	)?;
	let meal_plan_id: MealPlanId = parse_id("meal_plan_id", &meal_plan_id)?;
	let meal_plan = state
		.meal_plans
		.get_meal_plan(&cancel, household_id, meal_plan_id)
		.await?;
	Ok(negotiated.ok(&meal_plan))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), meal_plan_id = %meal_plan_id))]
pub async fn update_meal_plan(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(meal_plan_id): Path<String>,
	Decoded(body): Decoded<MealPlanUpdateRequest>,
) -> Result<Response, ApiError> {
	let household_id = active_household_capability(
		&session,
		"can_update_meal_plans",
		HouseholdRolePermissionChecker::can_update_meal_plans,
	)?;
	let meal_plan_id: MealPlanId = parse_id("meal_plan_id", &meal_plan_id)?;
	body.validate()?;

	let mut meal_plan = state
		.meal_plans
		.get_meal_plan(&cancel, household_id, meal_plan_id)
		.await?;
	body.apply_to(&mut meal_plan);
	state.meal_plans.update_meal_plan(&cancel, &meal_plan).await?;

	state.events.publish(
		DataChangeMessage::new(EventType::MealPlanUpdated, session.user_id())
			.household(household_id)
			.entity(&meal_plan),
	);
	Ok(negotiated.ok(&meal_plan))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), meal_plan_id = %meal_plan_id))]
pub async fn archive_meal_plan(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(meal_plan_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id = active_household_capability(
		&session,
		"can_archive_meal_plans",
		HouseholdRolePermissionChecker::can_archive_meal_plans,
	)?;
	let meal_plan_id: MealPlanId = parse_id("meal_plan_id", &meal_plan_id)?;
	state
		.meal_plans
		.archive_meal_plan(&cancel, household_id, meal_plan_id)
		.await?;
	tracing::info!("meal plan archived");

	state.events.publish(
		DataChangeMessage::new(EventType::MealPlanArchived, session.user_id())
			.household(household_id)
			.entity(&serde_json::json!({ "id": meal_plan_id })),
	);
	Ok(negotiated.no_content())
}
