// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Household invitation HTTP handlers.
//!
//! Invitations are created through the household routes. Only the sender and
//! the recipient can see an invitation; the recipient accepts or rejects it
//! and the sender can cancel it.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{InvitationUpdateRequest, ListResponse, PageQuery};
use larder_server_auth::{InvitationId, SessionContext};
use larder_server_db::{HouseholdInvitation, InvitationStatus};
use larder_server_events::{DataChangeMessage, EventType};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::{authorize, parse_id};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

fn is_sender(session: &SessionContext, invitation: &HouseholdInvitation) -> bool {
	invitation.from_user == session.user_id()
}

fn is_recipient(session: &SessionContext, invitation: &HouseholdInvitation) -> bool {
	invitation.to_user == Some(session.user_id())
}

async fn load(
	state: &AppState,
	cancel: &CancellationToken,
	raw_id: &str,
) -> Result<HouseholdInvitation, ApiError> {
	let id: InvitationId = parse_id("invitation_id", raw_id)?;
	Ok(state.invitations.get_invitation(cancel, id).await?)
}

#[instrument(skip_all, fields(user_id = %session.user_id(), invitation_id = %invitation_id))]
pub async fn get_invitation(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(invitation_id): Path<String>,
) -> Result<Response, ApiError> {
	let invitation = load(&state, &cancel, &invitation_id).await?;
	if !is_sender(&session, &invitation) && !is_recipient(&session, &invitation) {
		tracing::debug!("invitation read by a third party");
		return Err(ApiError::NotFound);
	}
	Ok(negotiated.ok(&invitation))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_sent_invitations(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let filter = query.filter();
	let invitations = state
		.invitations
		.list_sent_invitations(&cancel, session.user_id(), &filter)
		.await?;
	Ok(negotiated.ok(&ListResponse::new(invitations, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_received_invitations(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let filter = query.filter();
	let invitations = state
		.invitations
		.list_received_invitations(&cancel, session.user_id(), &filter)
		.await?;
	Ok(negotiated.ok(&ListResponse::new(invitations, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), invitation_id = %invitation_id))]
pub async fn accept_invitation(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(invitation_id): Path<String>,
	Decoded(body): Decoded<InvitationUpdateRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	let invitation = load(&state, &cancel, &invitation_id).await?;
	authorize(&session, is_recipient(&session, &invitation), "invitation_recipient")?;

	let invitation = state
		.invitations
		.accept_invitation(&cancel, invitation.id, session.user_id(), &body.note)
		.await?;
	tracing::info!(household_id = %invitation.destination_household, "invitation accepted");

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdInvitationAccepted, session.user_id())
			.household(invitation.destination_household)
			.entity(&invitation),
	);
	Ok(negotiated.accepted(&invitation))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), invitation_id = %invitation_id))]
pub async fn reject_invitation(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(invitation_id): Path<String>,
	Decoded(body): Decoded<InvitationUpdateRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	let invitation = load(&state, &cancel, &invitation_id).await?;
	authorize(&session, is_recipient(&session, &invitation), "invitation_recipient")?;

	let invitation = state
		.invitations
		.finalize_invitation(&cancel, invitation.id, InvitationStatus::Rejected, &body.note)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdInvitationRejected, session.user_id())
			.household(invitation.destination_household)
			.entity(&invitation),
	);
	Ok(negotiated.accepted(&invitation))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), invitation_id = %invitation_id))]
pub async fn cancel_invitation(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(invitation_id): Path<String>,
	Decoded(body): Decoded<InvitationUpdateRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	let invitation = load(&state, &cancel, &invitation_id).await?;
	authorize(&session, is_sender(&session, &invitation), "invitation_sender")?;

	let invitation = state
		.invitations
		.finalize_invitation(&cancel, invitation.id, InvitationStatus::Cancelled, &body.note)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::HouseholdInvitationCanceled, session.user_id())
			.household(invitation.destination_household)
			.entity(&invitation),
	);
	Ok(negotiated.accepted(&invitation))
}
