// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use axum::{
	extract::FromRef,
	middleware::{from_fn, from_fn_with_state},
	routing::{delete, get, patch, post, put, MethodRouter},
	Router,
};
use larder_common_encoding::ServerEncoderDecoder;
use larder_server_auth::{Permission, SessionResolver};
use larder_server_config::ServerConfig;
use larder_server_db::{
	HouseholdStore, InvitationStore, MealPlanStore, MemoryStore, RecipeStore, UserStore,
	ValidIngredientStore, WebhookStore,
};
use larder_server_events::Publisher;
use std::sync::Arc;

use crate::api_response::ApiError;
use crate::authz::{RequirePermission, RequireServiceAdmin};
use crate::cancellation::cancellation_layer;
use crate::codec::negotiate_layer;
use crate::events::EventPublisher;
use crate::routes;
use crate::session::session_layer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub households: Arc<dyn HouseholdStore>,
	pub invitations: Arc<dyn InvitationStore>,
	pub webhooks: Arc<dyn WebhookStore>,
	pub meal_plans: Arc<dyn MealPlanStore>,
	pub recipes: Arc<dyn RecipeStore>,
	pub valid_ingredients: Arc<dyn ValidIngredientStore>,
	pub users: Arc<dyn UserStore>,
	pub sessions: Arc<dyn SessionResolver>,
	pub session_cookie_name: String,
	pub codec: ServerEncoderDecoder,
	pub events: EventPublisher,
}

impl FromRef<AppState> for ServerEncoderDecoder {
	fn from_ref(state: &AppState) -> Self {
		state.codec
	}
}

/// Creates the application state with every data manager backed by `store`.
pub fn create_app_state(
	store: Arc<MemoryStore>,
	sessions: Arc<dyn SessionResolver>,
	publisher: Arc<dyn Publisher>,
	config: &ServerConfig,
) -> AppState {
	AppState {
		households: store.clone(),
		invitations: store.clone(),
		webhooks: store.clone(),
		meal_plans: store.clone(),
		recipes: store.clone(),
		valid_ingredients: store.clone(),
		users: store,
		sessions,
		session_cookie_name: config.auth.session_cookie_name.clone(),
		codec: ServerEncoderDecoder::new(config.encoding.default_content_type),
		events: EventPublisher::new(publisher, config.events.data_changes_topic.clone()),
	}
}

/// A method router guarded by a single permission.
fn guarded(route: MethodRouter<AppState>, permission: Permission) -> MethodRouter<AppState> {
	route.route_layer(RequirePermission::new(permission))
}

fn household_routes() -> Router<AppState> {
	use routes::households as h;

	Router::new()
		.route("/", get(h::list_households).post(h::create_household))
		.route("/current", get(h::current_household))
		.route(
			"/{household_id}",
			get(h::get_household)
				.put(h::update_household)
				.delete(h::archive_household),
		)
		.route("/{household_id}/default", post(h::mark_as_default))
		.route("/{household_id}/transfer", post(h::transfer_ownership))
		.route("/{household_id}/invite", post(h::invite_member))
		.route("/{household_id}/members/{user_id}", delete(h::remove_member))
		.route(
			"/{household_id}/members/{user_id}/permissions",
			patch(h::modify_member_roles),
		)
}

fn invitation_routes() -> Router<AppState> {
	use routes::invitations as i;

	Router::new()
		.route("/sent", get(i::list_sent_invitations))
		.route("/received", get(i::list_received_invitations))
		.route("/{invitation_id}", get(i::get_invitation))
		.route("/{invitation_id}/accept", put(i::accept_invitation))
		.route("/{invitation_id}/reject", put(i::reject_invitation))
		.route("/{invitation_id}/cancel", put(i::cancel_invitation))
}

fn webhook_routes() -> Router<AppState> {
	use routes::webhooks as w;

	Router::new()
		.route(
			"/",
			guarded(get(w::list_webhooks), Permission::READ_WEBHOOKS)
				.merge(guarded(post(w::create_webhook), Permission::CREATE_WEBHOOKS)),
		)
		.route(
			"/{webhook_id}",
			guarded(get(w::get_webhook), Permission::READ_WEBHOOKS)
				.merge(guarded(delete(w::archive_webhook), Permission::ARCHIVE_WEBHOOKS)),
		)
		.route(
			"/{webhook_id}/trigger_events",
			guarded(
				post(w::add_trigger_event),
				Permission::CREATE_WEBHOOK_TRIGGER_EVENTS,
			),
		)
		.route(
			"/{webhook_id}/trigger_events/{trigger_event_id}",
			guarded(
				delete(w::archive_trigger_event),
				Permission::ARCHIVE_WEBHOOK_TRIGGER_EVENTS,
			),
		)
}

fn meal_plan_routes() -> Router<AppState> {
	use routes::meal_plans as m;

	Router::new()
		.route("/", get(m::list_meal_plans).post(m::create_meal_plan))
		.route(
			"/{meal_plan_id}",
			get(m::get_meal_plan)
				.put(m::update_meal_plan)
				.delete(m::archive_meal_plan),
		)
}

fn recipe_routes() -> Router<AppState> {
	use routes::recipes as r;

	Router::new()
		.route(
			"/",
			guarded(get(r::list_recipes), Permission::READ_RECIPES)
				.merge(guarded(post(r::create_recipe), Permission::CREATE_RECIPES)),
		)
		.route(
			"/search",
			guarded(get(r::search_recipes), Permission::SEARCH_RECIPES),
		)
		.route(
			"/{recipe_id}",
			guarded(get(r::get_recipe), Permission::READ_RECIPES)
				.merge(guarded(put(r::update_recipe), Permission::UPDATE_RECIPES))
				.merge(guarded(delete(r::archive_recipe), Permission::ARCHIVE_RECIPES)),
		)
}

fn valid_ingredient_routes() -> Router<AppState> {
	use routes::valid_ingredients as v;

	Router::new()
		.route(
			"/",
			guarded(
				post(v::create_valid_ingredient),
				Permission::CREATE_VALID_INGREDIENTS,
			),
		)
		.route(
			"/search",
			guarded(
				get(v::search_valid_ingredients),
				Permission::SEARCH_VALID_INGREDIENTS,
			),
		)
		.route(
			"/{valid_ingredient_id}",
			guarded(
				get(v::get_valid_ingredient),
				Permission::READ_VALID_INGREDIENTS,
			)
			.merge(guarded(
				put(v::update_valid_ingredient),
				Permission::UPDATE_VALID_INGREDIENTS,
			))
			.merge(guarded(
				delete(v::archive_valid_ingredient),
				Permission::ARCHIVE_VALID_INGREDIENTS,
			)),
		)
}

fn user_routes() -> Router<AppState> {
	use routes::users as u;

	let admin = Router::new()
		.route("/", get(u::list_users))
		.route("/search", get(u::search_users))
		.route("/status", put(u::update_user_status))
		.route("/{user_id}", get(u::get_user))
		.route_layer(RequireServiceAdmin);

	Router::new()
		.route("/self", get(u::get_self))
		.route("/permissions/check", post(u::check_permissions))
		.merge(admin)
}

/// Creates the API router with all routes.
///
/// Layers run outermost first: content negotiation, session attachment,
/// request cancellation. Route-level permission layers sit inside all three,
/// so their rejections are negotiated like any other error.
pub fn create_router(state: AppState) -> Router {
	let api = Router::new()
		.nest("/households", household_routes())
		.nest("/household_invitations", invitation_routes())
		.nest("/webhooks", webhook_routes())
		.nest("/meal_plans", meal_plan_routes())
		.nest("/recipes", recipe_routes())
		.nest("/valid_ingredients", valid_ingredient_routes())
		.nest("/users", user_routes());

	let codec = state.codec;
	Router::new()
		.route("/health", get(routes::health::health_check))
		.nest("/api/v1", api)
		.fallback(|| async { ApiError::NotFound })
		.layer(from_fn(cancellation_layer))
		.layer(from_fn_with_state(state.clone(), session_layer))
		.layer(from_fn_with_state(codec, negotiate_layer))
		.with_state(state)
}
