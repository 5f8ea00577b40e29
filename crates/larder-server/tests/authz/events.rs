// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data-change events published by handlers.

use axum::http::StatusCode;
use larder_server_events::{DataType, EventType};
use serde_json::json;
use std::sync::Arc;

use super::support::{json_body, FailingPublisher, TestApp};

#[tokio::test]
async fn publish_failures_do_not_fail_the_request() {
	let app = TestApp::with_publisher(Arc::new(FailingPublisher)).await;
	let response = app
		.post(
			"/api/v1/recipes",
			Some(&app.fixtures.admin),
			json!({ "name": "Chili", "yields_portions": 4 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	assert_eq!(json_body(response).await["slug"], "chili");
}

#[tokio::test]
async fn household_changes_carry_the_household_and_entity() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;

	let response = app
		.post(
			&format!("/api/v1/households/{}/invite", a.household.id),
			Some(&a.owner),
			json!({ "to_email": "friend@larder.test" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let invitation = json_body(response).await;

	let messages = app.publisher.messages();
	assert_eq!(messages.len(), 1);
	let (topic, message) = &messages[0];
	assert_eq!(topic, "data_changes");
	assert_eq!(message.event_type, EventType::HouseholdInvitationCreated);
	assert_eq!(message.data_type, DataType::HouseholdInvitation);
	assert_eq!(message.user_id, a.owner.user.id);
	assert_eq!(message.household_id, Some(a.household.id));
	assert_eq!(message.payload.as_ref().unwrap()["id"], invitation["id"]);
}

#[tokio::test]
async fn recipe_changes_carry_the_active_household_when_present() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let member = &app.fixtures.household_b.member;

	let response = app
		.post(
			"/api/v1/recipes",
			Some(admin),
			json!({ "name": "Dal", "yields_portions": 2 }),
		)
		.await;
	let recipe = json_body(response).await;

	let response = app
		.put(
			&format!("/api/v1/recipes/{}", recipe["id"].as_str().unwrap()),
			Some(member),
			json!({ "description": "red lentils" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let messages = app.publisher.messages();
	assert_eq!(messages.len(), 2);
	assert_eq!(messages[0].1.event_type, EventType::RecipeCreated);
	assert!(messages[0].1.household_id.is_none());
	assert_eq!(messages[1].1.event_type, EventType::RecipeUpdated);
	assert_eq!(
		messages[1].1.household_id,
		Some(app.fixtures.household_b.household.id)
	);
}

#[tokio::test]
async fn rejected_requests_publish_nothing() {
	let app = TestApp::new().await;
	let member = &app.fixtures.household_a.member;

	let response = app
		.post(
			"/api/v1/recipes",
			Some(member),
			json!({ "name": "Chili", "yields_portions": 4 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let response = app
		.post(
			"/api/v1/recipes",
			Some(&app.fixtures.admin),
			json!({ "name": "", "yields_portions": 4 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	assert!(app.publisher.messages().is_empty());
}
