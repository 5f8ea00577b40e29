// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for recipe routes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

async fn create_recipe(app: &TestApp, name: &str) -> serde_json::Value {
	let response = app
		.post(
			"/api/v1/recipes",
			Some(&app.fixtures.admin),
			json!({ "name": name, "yields_portions": 4 }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	json_body(response).await
}

#[tokio::test]
async fn recipe_routes_require_the_right_role() {
	let app = TestApp::new().await;
	let recipe = create_recipe(&app, "Chili").await;
	let id = recipe["id"].as_str().unwrap();
	let a = &app.fixtures.household_a;

	let cases = vec![
		AuthzCase {
			name: "member cannot create",
			method: Method::POST,
			path: "/api/v1/recipes".to_string(),
			user: Some(a.owner.clone()),
			body: Some(json!({ "name": "Soup", "yields_portions": 2 })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member lists",
			method: Method::GET,
			path: "/api/v1/recipes".to_string(),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member reads",
			method: Method::GET,
			path: format!("/api/v1/recipes/{id}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member updates",
			method: Method::PUT,
			path: format!("/api/v1/recipes/{id}"),
			user: Some(a.member.clone()),
			body: Some(json!({ "yields_portions": 6 })),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider cannot read",
			method: Method::GET,
			path: format!("/api/v1/recipes/{id}"),
			user: Some(app.fixtures.outsider.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown recipe",
			method: Method::GET,
			path: format!("/api/v1/recipes/{}", uuid_like()),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

fn uuid_like() -> &'static str {
	"00000000-0000-4000-8000-000000000000"
}

#[tokio::test]
async fn search_matches_names_and_requires_a_term() {
	let app = TestApp::new().await;
	create_recipe(&app, "Green Chili").await;
	create_recipe(&app, "Pancakes").await;
	let member = &app.fixtures.household_a.member;

	let response = app.get("/api/v1/recipes/search?q=chili", Some(member)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let found = json_body(response).await;
	let data = found["data"].as_array().unwrap();
	assert_eq!(data.len(), 1);
	assert_eq!(data[0]["slug"], "green-chili");

	let response = app.get("/api/v1/recipes/search?q=%20", Some(member)).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn members_archive_recipes() {
	let app = TestApp::new().await;
	let recipe = create_recipe(&app, "Chili").await;
	let path = format!("/api/v1/recipes/{}", recipe["id"].as_str().unwrap());
	let member = &app.fixtures.household_a.member;

	let response = app.delete(&path, Some(member)).await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = app.get(&path, Some(member)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
