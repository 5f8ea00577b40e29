// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Webhook HTTP handlers. Permissions are enforced by route layers; every
//! handler works in the caller's active household.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{
	ListResponse, PageQuery, WebhookCreationRequest, WebhookTriggerEventCreationRequest,
};
use larder_server_auth::{WebhookId, WebhookTriggerEventId};
use larder_server_db::WebhookTriggerEvent;
use larder_server_events::{DataChangeMessage, EventType};
use tracing::instrument;

use super::{active_household, parse_id};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_webhooks(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let household_id = active_household(&session)?;
	let filter = query.filter();
	let webhooks = state
		.webhooks
		.list_webhooks(&cancel, household_id, &filter)
		.await?;
	Ok(negotiated.ok(&ListResponse::new(webhooks, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn create_webhook(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Decoded(body): Decoded<WebhookCreationRequest>,
) -> Result<Response, ApiError> {
	let household_id = active_household(&session)?;
	body.validate()?;

	let webhook = body.into_webhook(household_id);
	state.webhooks.create_webhook(&cancel, &webhook).await?;
	tracing::info!(webhook_id = %webhook.id, %household_id, "webhook created");

	state.events.publish(
		DataChangeMessage::new(EventType::WebhookCreated, session.user_id())
			.household(household_id)
			.entity(&webhook),
	);
	Ok(negotiated.created(&webhook))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), webhook_id = %webhook_id))]
pub async fn get_webhook(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(webhook_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id = active_household(&session)?;
	let webhook_id: WebhookId = parse_id("webhook_id", &webhook_id)?;
	let webhook = state
		.webhooks
		.get_webhook(&cancel, household_id, webhook_id)
		.await?;
	Ok(negotiated.ok(&webhook))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), webhook_id = %webhook_id))]
pub async fn archive_webhook(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(webhook_id): Path<String>,
) -> Result<Response, ApiError> {
	let household_id = active_household(&session)?;
	let webhook_id: WebhookId = parse_id("webhook_id", &webhook_id)?;
	state
		.webhooks
		.archive_webhook(&cancel, household_id, webhook_id)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::WebhookArchived, session.user_id())
			.household(household_id)
			.entity(&serde_json::json!({ "id": webhook_id })),
	);
	Ok(negotiated.no_content())
}

#[instrument(skip_all, fields(user_id = %session.user_id(), webhook_id = %webhook_id))]
pub async fn add_trigger_event(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(webhook_id): Path<String>,
	Decoded(body): Decoded<WebhookTriggerEventCreationRequest>,
) -> Result<Response, ApiError> {
	let household_id = active_household(&session)?;
	let webhook_id: WebhookId = parse_id("webhook_id", &webhook_id)?;
	body.validate()?;

	let event = WebhookTriggerEvent::new(webhook_id, body.trigger_event);
	state
		.webhooks
		.add_trigger_event(&cancel, household_id, &event)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::WebhookTriggerEventCreated, session.user_id())
			.household(household_id)
			.entity(&event),
	);
	Ok(negotiated.created(&event))
}

#[instrument(
	skip_all,
	fields(user_id = %session.user_id(), webhook_id = %webhook_id, trigger_event_id = %trigger_event_id)
)]
pub async fn archive_trigger_event(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path((webhook_id, trigger_event_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
	let household_id = active_household(&session)?;
	let webhook_id: WebhookId = parse_id("webhook_id", &webhook_id)?;
	let trigger_event_id: WebhookTriggerEventId =
		parse_id("trigger_event_id", &trigger_event_id)?;
	state
		.webhooks
		.archive_trigger_event(&cancel, household_id, webhook_id, trigger_event_id)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::WebhookTriggerEventArchived, session.user_id())
			.household(household_id)
			.entity(&serde_json::json!({ "id": trigger_event_id, "webhook_id": webhook_id })),
	);
	Ok(negotiated.no_content())
}
