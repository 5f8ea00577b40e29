// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Household HTTP handlers.
//!
//! Handlers that act on a specific household authorize against the caller's
//! checker for that household, taken from the path. Callers who are not
//! members of a household cannot read it and get 404.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{
	HouseholdCreationRequest, HouseholdUpdateRequest, IdResponse, InvitationCreationRequest,
	ListResponse, ModifyMemberRolesRequest, PageQuery, TransferOwnershipRequest,
};
use larder_server_auth::{HouseholdId, HouseholdRolePermissionChecker, UserId};
use larder_server_db::{DataError, HouseholdInvitation};
use larder_server_events::{DataChangeMessage, EventType};
use tracing::instrument;

use super::{authorize, household_capability, parse_id};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_households(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let filter = query.filter();
	let households = if session.service_checker().is_service_admin() {
		state.households.list_all_households(&cancel, &filter).await?
	} else {
		state
			.households
			.list_households_for_user(&cancel, session.user_id(), &filter)
			.await?
	};
	Ok(negotiated.ok(&ListResponse::new(households, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn create_household(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Decoded(body): Decoded<HouseholdCreationRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	let household = body.into_household(session.user_id());
	state.households.create_household(&cancel, &household).await?;
	tracing::info!(household_id = %household.id, "household created");

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdCreated, session.user_id())
			.household(household.id)
			.entity(&household),
	);
	Ok(negotiated.created(&household))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn current_household(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
) -> Result<Response, ApiError> {
	let (household_id, _) = session.active_household_checker()?;
	let household = state.households.get_household(&cancel, household_id).await?;
	Ok(negotiated.ok(&household))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), household_id = %household_id))]
pub async fn get_household(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(household_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	if session.household_checker(household_id).is_none()
		&& !session.service_checker().is_service_admin()
	{
		tracing::debug!("household read by non-member");
		return Err(ApiError::NotFound);
	}
	let household = state.households.get_household(&cancel, household_id).await?;
	Ok(negotiated.ok(&household))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), household_id = %household_id))]
pub async fn update_household(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(household_id): Path<String>,
	Decoded(body): Decoded<HouseholdUpdateRequest>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	let allowed = session.service_checker().can_update_households()
		|| session
			.household_checker(household_id)
			.is_some_and(HouseholdRolePermissionChecker::can_update_household);
	authorize(&session, allowed, "can_update_household")?;
	body.validate()?;

	let mut household = state.households.get_household(&cancel, household_id).await?;
	body.apply_to(&mut household);
	state.households.update_household(&cancel, &household).await?;

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdUpdated, session.user_id())
			.household(household_id)
			.entity(&household),
	);
	Ok(negotiated.ok(&household))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), household_id = %household_id))]
pub async fn archive_household(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(household_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	household_capability(
		&session,
		household_id,
		"can_archive_household",
		HouseholdRolePermissionChecker::can_archive_household,
	)?;
	state.households.archive_household(&cancel, household_id).await?;
	tracing::info!("household archived");

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdArchived, session.user_id())
			.household(household_id),
	);
	Ok(negotiated.no_content())
}

#[instrument(
	skip_all,
	fields(user_id = %session.user_id(), household_id = %household_id, member_id = %member_id)
)]
pub async fn modify_member_roles(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path((household_id, member_id)): Path<(String, String)>,
	Decoded(body): Decoded<ModifyMemberRolesRequest>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	let member_id: UserId = parse_id("user_id", &member_id)?;
	household_capability(
		&session,
		household_id,
		"can_modify_member_permissions_for_household",
		HouseholdRolePermissionChecker::can_modify_member_permissions_for_household,
	)?;
	body.validate()?;

	let household = state
		.households
		.modify_member_roles(&cancel, household_id, member_id, body.new_roles.clone())
		.await?;
	tracing::info!(roles = ?body.new_roles, reason = %body.reason, "member roles modified");

	state.events.publish(
		DataChangeMessage::new(
			EventType::HouseholdMembershipPermissionsUpdated,
			session.user_id(),
		)
		.household(household_id)
		.entity(&household),
	);
	Ok(negotiated.accepted(&household))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), household_id = %household_id))]
pub async fn transfer_ownership(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(household_id): Path<String>,
	Decoded(body): Decoded<TransferOwnershipRequest>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	household_capability(
		&session,
		household_id,
		"can_transfer_household_to_new_owner",
		HouseholdRolePermissionChecker::can_transfer_household_to_new_owner,
	)?;
	body.validate()?;

	let household = state.households.get_household(&cancel, household_id).await?;
	if household.belongs_to_user != body.current_owner {
		return Err(ApiError::invalid_input(
			"current_owner: does not own this household",
		));
	}
	let household = state
		.households
		.transfer_ownership(&cancel, household_id, body.new_owner)
		.await?;
	tracing::info!(new_owner = %body.new_owner, "household ownership transferred");

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdOwnershipTransferred, session.user_id())
			.household(household_id)
			.entity(&household),
	);
	Ok(negotiated.accepted(&household))
}

#[instrument(
	skip_all,
	fields(user_id = %session.user_id(), household_id = %household_id, member_id = %member_id)
)]
pub async fn remove_member(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path((household_id, member_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	let member_id: UserId = parse_id("user_id", &member_id)?;
	household_capability(
		&session,
		household_id,
		"can_remove_member_from_household",
		HouseholdRolePermissionChecker::can_remove_member_from_household,
	)?;

	let household = state
		.households
		.remove_member(&cancel, household_id, member_id)
		.await?;
	tracing::info!("member removed from household");

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdMemberRemoved, session.user_id())
			.household(household_id)
			.entity(&household),
	);
	Ok(negotiated.accepted(&household))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), household_id = %household_id))]
pub async fn mark_as_default(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(household_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	let is_member = session.household_checker(household_id).is_some();
	authorize(&session, is_member, "household_member")?;

	state
		.households
		.mark_as_default(&cancel, session.user_id(), household_id)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdMarkedAsDefault, session.user_id())
			.household(household_id),
	);
	Ok(negotiated.accepted(&IdResponse::new(household_id)))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), household_id = %household_id))]
pub async fn invite_member(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(household_id): Path<String>,
	Decoded(body): Decoded<InvitationCreationRequest>,
) -> Result<Response, ApiError> {
	let household_id: HouseholdId = parse_id("household_id", &household_id)?;
	household_capability(
		&session,
		household_id,
		"can_invite_users_to_household",
		HouseholdRolePermissionChecker::can_invite_users_to_household,
	)?;
	body.validate()?;

	let to_user = match state.users.get_user_by_email(&cancel, &body.to_email).await {
		Ok(user) => Some(user.id),
		Err(DataError::NotFound(_)) => None,
		Err(e) => return Err(e.into()),
	};
	let invitation = HouseholdInvitation::new(
		household_id,
		session.user_id(),
		body.to_email,
		to_user,
		body.note,
	);
	state.invitations.create_invitation(&cancel, &invitation).await?;
	tracing::info!(invitation_id = %invitation.id, "household invitation created");

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdInvitationCreated, session.user_id())
			.household(household_id)
			.entity(&invitation),
	);
	Ok(negotiated.created(&invitation))
}
