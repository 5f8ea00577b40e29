// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recipe HTTP handlers.
//!
//! Recipes are shared across households. Every route is guarded by a
//! permission layer; creating one needs the service-level `create.recipes`.

use axum::{
	extract::{Path, State},
	response::Response,
};
use larder_server_api::{
	ListResponse, PageQuery, RecipeCreationRequest, RecipeUpdateRequest, SearchQuery,
};
use larder_server_auth::{RecipeId, SessionContext};
use larder_server_events::{DataChangeMessage, EventType};
use tracing::instrument;

use super::{parse_id, search_term};
use crate::api::AppState;
use crate::api_response::ApiError;
use crate::cancellation::RequestCancellation;
use crate::codec::{Decoded, Negotiated, Params};
use crate::session::Session;

/// Recipe events carry the active household when the caller has one.
fn recipe_change(event_type: EventType, session: &SessionContext) -> DataChangeMessage {
	let message = DataChangeMessage::new(event_type, session.user_id());
	match session.active_household_checker() {
		Ok((household_id, _)) => message.household(household_id),
		Err(_) => message,
	}
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn list_recipes(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<PageQuery>,
) -> Result<Response, ApiError> {
	let filter = query.filter();
	let recipes = state.recipes.list_recipes(&cancel, &filter).await?;
	Ok(negotiated.ok(&ListResponse::new(recipes, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn search_recipes(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Params(query): Params<SearchQuery>,
) -> Result<Response, ApiError> {
	let term = search_term(&query)?;
	let filter = query.filter();
	let recipes = state.recipes.search_recipes(&cancel, term, &filter).await?;
	Ok(negotiated.ok(&ListResponse::new(recipes, &filter)))
}

#[instrument(skip_all, fields(user_id = %session.user_id()))]
pub async fn create_recipe(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Decoded(body): Decoded<RecipeCreationRequest>,
) -> Result<Response, ApiError> {
	body.validate()?;
	let recipe = body.into_recipe(session.user_id());
	state.recipes.create_recipe(&cancel, &recipe).await?;
	tracing::info!(recipe_id = %recipe.id, slug = %recipe.slug, "recipe created");

	state
		.events
		.publish(recipe_change(EventType::RecipeCreated, &session).entity(&recipe));
	Ok(negotiated.created(&recipe))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), recipe_id = %recipe_id))]
pub async fn get_recipe(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(recipe_id): Path<String>,
) -> Result<Response, ApiError> {
	let recipe_id: RecipeId = parse_id("recipe_id", &recipe_id)?;
	let recipe = state.recipes.get_recipe(&cancel, recipe_id).await?;
	Ok(negotiated.ok(&recipe))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), recipe_id = %recipe_id))]
pub async fn update_recipe(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(recipe_id): Path<String>,
	Decoded(body): Decoded<RecipeUpdateRequest>,
) -> Result<Response, ApiError> {
	let recipe_id: RecipeId = parse_id("recipe_id", &recipe_id)?;
	body.validate()?;

	let mut recipe = state.recipes.get_recipe(&cancel, recipe_id).await?;
	body.apply_to(&mut recipe);
	state.recipes.update_recipe(&cancel, &recipe).await?;

	state
		.events
		.publish(recipe_change(EventType::RecipeUpdated, &session).entity(&recipe));
	Ok(negotiated.ok(&recipe))
}

#[instrument(skip_all, fields(user_id = %session.user_id(), recipe_id = %recipe_id))]
pub async fn archive_recipe(
	State(state): State<AppState>,
	Session(session): Session,
	RequestCancellation(cancel): RequestCancellation,
	negotiated: Negotiated,
	Path(recipe_id): Path<String>,
) -> Result<Response, ApiError> {
	let recipe_id: RecipeId = parse_id("recipe_id", &recipe_id)?;
	state.recipes.archive_recipe(&cancel, recipe_id).await?;
	tracing::info!("recipe archived");

	state.events.publish(
		recipe_change(EventType::RecipeArchived, &session)
			.entity(&serde_json::json!({ "id": recipe_id })),
	);
	Ok(negotiated.no_content())
}
