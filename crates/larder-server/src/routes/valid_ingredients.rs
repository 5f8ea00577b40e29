// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Valid ingredient (reference data) handlers. Writes need service-admin
//! permissions, reads need the member permission; both come from route layers.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{
	ListResponse, SearchQuery, ValidIngredientCreationRequest, ValidIngredientUpdateRequest,
};
use larder_server_auth::ValidIngredientId;
use larder_server_events::{DataChangeMessage, EventType};
use tracing::instrument;

use super::{parse_id, search_term};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn search_valid_ingredients(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<SearchQuery>,
) -> Result<Response, ApiError> {
	let term = search_term(&query)?;
	let filter = query.filter();
	let ingredients = state
		.valid_ingredients
		.search_valid_ingredients(&cancel, term, &filter)
		.await?;
	Ok(negotiated.ok(&ListResponse::new(ingredients, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn create_valid_ingredient(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Decoded(body): Decoded<ValidIngredientCreationRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	let ingredient = body.into_valid_ingredient();
	state
		.valid_ingredients
		.create_valid_ingredient(&cancel, &ingredient)
		.await?;
	tracing::info!(valid_ingredient_id = %ingredient.id, name = %ingredient.name, "valid ingredient created");

	state.events.publish(
		DataChangeMessage::new(EventType::ValidIngredientCreated, session.user_id())
			.entity(&ingredient),
	);
	Ok(negotiated.created(&ingredient))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), valid_ingredient_id = %ingredient_id))]
pub async fn get_valid_ingredient(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(ingredient_id): Path<String>,
) -> Result<Response, ApiError> {
	let ingredient_id: ValidIngredientId = parse_id("valid_ingredient_id", &ingredient_id)?;
	let ingredient = state
		.valid_ingredients
		.get_valid_ingredient(&cancel, ingredient_id)
		.await?;
	Ok(negotiated.ok(&ingredient))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), valid_ingredient_id = %ingredient_id))]
pub async fn update_valid_ingredient(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(ingredient_id): Path<String>,
	Decoded(body): Decoded<ValidIngredientUpdateRequest>,
) -> Result<Response, ApiError> {
	let ingredient_id: ValidIngredientId = parse_id("valid_ingredient_id", &ingredient_id)?;
	body.validate()?;

	let mut ingredient = state
		.valid_ingredients
		.get_valid_ingredient(&cancel, ingredient_id)
		.await?;
	body.apply_to(&mut ingredient);
	state
		.valid_ingredients
		.update_valid_ingredient(&cancel, &ingredient)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::ValidIngredientUpdated, session.user_id())
			.entity(&ingredient),
	);
	Ok(negotiated.ok(&ingredient))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), valid_ingredient_id = %ingredient_id))]
pub async fn archive_valid_ingredient(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(ingredient_id): Path<String>,
) -> Result<Response, ApiError> {
	let ingredient_id: ValidIngredientId = parse_id("valid_ingredient_id", &ingredient_id)?;
	state
		.valid_ingredients
		.archive_valid_ingredient(&cancel, ingredient_id)
		.await?;

	state.events.publish(
		DataChangeMessage::new(EventType::ValidIngredientArchived, session.user_id())
			.entity(&serde_json::json!({ "id": ingredient_id })),
	);
	Ok(negotiated.no_content())
}
