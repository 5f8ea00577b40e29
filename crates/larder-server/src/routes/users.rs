// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User HTTP handlers.
//!
//! `self` and the permission check are open to any session. Listing, reading,
//! searching and status changes sit behind the service-admin layer.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{
	ListResponse, PageQuery, PermissionCheckRequest, PermissionCheckResponse, SearchQuery,
	UserStatusUpdateRequest,
};
use larder_server_auth::UserId;
use larder_server_events::{DataChangeMessage, EventType};
use tracing::instrument;

use super::{parse_id, search_term};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn get_self(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
) -> Result<Response, ApiError> {
	let user = state.users.get_user(&cancel, session.user_id()).await?;
	Ok(negotiated.ok(&user))
}

/// Reports, for each requested permission, whether the caller holds it through
/// their service roles or their active household.
#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn check_permissions(
	Session(session): Session,
	negotiated: Negotiated,
	Decoded(body): Decoded<PermissionCheckRequest>,
) -> Result<Response, ApiError> {
	let permissions = body
		.parsed()?
		.into_iter()
		.map(|permission| (permission.id().to_string(), session.has_permission(permission)))
		.collect();
	Ok(negotiated.ok(&PermissionCheckResponse { permissions }))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_users(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let filter = query.filter();
	let users = state.users.list_users(&cancel, &filter).await?;
	Ok(negotiated.ok(&ListResponse::new(users, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn search_users(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<SearchQuery>,
) -> Result<Response, ApiError> {
	let prefix = search_term(&query)?;
	let filter = query.filter();
	let users = state
		.users
		.search_users_by_username(&cancel, prefix, &filter)
		.await?;
	Ok(negotiated.ok(&ListResponse::new(users, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), target_user_id = %target_user_id))]
pub async fn get_user(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(target_user_id): Path<String>,
) -> Result<Response, ApiError> {
	let target_user_id: UserId = parse_id("user_id", &target_user_id)?;
	let user = state.users.get_user(&cancel, target_user_id).await?;
	Ok(negotiated.ok(&user))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn update_user_status(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Decoded(body): Decoded<UserStatusUpdateRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	if body.target_user_id == session.user_id() {
		return Err(ApiError::invalid_input(
			"target_user_id: cannot change your own account status",
		));
	}

	let user = state
		.users
		.update_account_status(&cancel, body.target_user_id, body.new_status, &body.reason)
		.await?;
	tracing::info!(
		target_user_id = %user.id,
		status = %body.new_status.as_str(),
		"user account status updated"
	);

	state.events.publish(
		DataChangeMessage::new(EventType::UserAccountStatusUpdated, session.user_id())
			.entity(&user),
	);
	Ok(negotiated.accepted(&user))
}
