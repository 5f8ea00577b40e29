// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for valid ingredient routes.

use axum::http::{Method, StatusCode};
use larder_server_events::EventType;
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn only_service_admins_manage_valid_ingredients() {
	let app = TestApp::new().await;
	let response = app
		.post(
			"/api/v1/valid_ingredients",
			Some(&app.fixtures.admin),
			json!({ "name": "Cumin", "plural_name": "Cumin" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let id = json_body(response).await["id"].as_str().unwrap().to_string();
	let a = &app.fixtures.household_a;

	let cases = vec![
		AuthzCase {
			name: "household owner cannot create",
			method: Method::POST,
			path: "/api/v1/valid_ingredients".to_string(),
			user: Some(a.owner.clone()),
			body: Some(json!({ "name": "Salt" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member reads",
			method: Method::GET,
			path: format!("/api/v1/valid_ingredients/{id}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member searches",
			method: Method::GET,
			path: "/api/v1/valid_ingredients/search?q=cum".to_string(),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member cannot update",
			method: Method::PUT,
			path: format!("/api/v1/valid_ingredients/{id}"),
			user: Some(a.member.clone()),
			body: Some(json!({ "is_liquid": true })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member cannot archive",
			method: Method::DELETE,
			path: format!("/api/v1/valid_ingredients/{id}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin updates",
			method: Method::PUT,
			path: format!("/api/v1/valid_ingredients/{id}"),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "description": "ground seed" })),
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn duplicate_names_conflict() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let first = app
		.post("/api/v1/valid_ingredients", Some(admin), json!({ "name": "Basil" }))
		.await;
	assert_eq!(first.status(), StatusCode::CREATED);

	let second = app
		.post("/api/v1/valid_ingredients", Some(admin), json!({ "name": "basil" }))
		.await;
	assert_eq!(second.status(), StatusCode::CONFLICT);

	let found = json_body(
		app.get(
			"/api/v1/valid_ingredients/search?q=basil",
			Some(&app.fixtures.household_b.member),
		)
		.await,
	)
	.await;
	assert_eq!(found["data"].as_array().unwrap().len(), 1);

	// Service-level changes carry no household.
	let messages = app.publisher.messages();
	assert_eq!(messages.len(), 1);
	assert_eq!(messages[0].1.event_type, EventType::ValidIngredientCreated);
	assert!(messages[0].1.household_id.is_none());
}
